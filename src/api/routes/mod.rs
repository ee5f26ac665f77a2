pub mod matches;
pub mod meta;
pub mod predict;
pub mod stats;
