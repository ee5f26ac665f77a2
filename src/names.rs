//! Display names for teams.
//!
//! Results files spell the same club several ways ("Man United",
//! "Nott'm Forest", "Ath Madrid"). This maps those variants to one label for
//! presentation. Queries and filters always use the stored name.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Lowercased raw variant -> canonical label.
static CANONICAL_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Premier League
        ("man united", "Manchester United"),
        ("man utd", "Manchester United"),
        ("manchester utd", "Manchester United"),
        ("man city", "Manchester City"),
        ("nott'm forest", "Nottingham Forest"),
        ("nottingham", "Nottingham Forest"),
        ("spurs", "Tottenham Hotspur"),
        ("tottenham", "Tottenham Hotspur"),
        ("wolves", "Wolverhampton Wanderers"),
        ("wolverhampton", "Wolverhampton Wanderers"),
        ("newcastle", "Newcastle United"),
        ("west ham", "West Ham United"),
        ("brighton", "Brighton & Hove Albion"),
        ("leicester", "Leicester City"),
        ("leeds", "Leeds United"),
        ("norwich", "Norwich City"),
        ("sheffield united", "Sheffield United"),
        ("sheffield utd", "Sheffield United"),
        ("west brom", "West Bromwich Albion"),
        ("luton", "Luton Town"),
        ("ipswich", "Ipswich Town"),
        // La Liga
        ("ath madrid", "Atletico Madrid"),
        ("atl. madrid", "Atletico Madrid"),
        ("ath bilbao", "Athletic Bilbao"),
        ("betis", "Real Betis"),
        ("sociedad", "Real Sociedad"),
        ("celta", "Celta Vigo"),
        ("espanol", "Espanyol"),
        ("vallecano", "Rayo Vallecano"),
        ("alaves", "Deportivo Alaves"),
        // Serie A
        ("inter", "Inter Milan"),
        ("milan", "AC Milan"),
        ("roma", "AS Roma"),
        ("verona", "Hellas Verona"),
        // Bundesliga
        ("bayern munich", "Bayern Munich"),
        ("dortmund", "Borussia Dortmund"),
        ("m'gladbach", "Borussia Monchengladbach"),
        ("ein frankfurt", "Eintracht Frankfurt"),
        ("leverkusen", "Bayer Leverkusen"),
        ("fc koln", "1. FC Koln"),
        ("hertha", "Hertha Berlin"),
        ("rb leipzig", "RB Leipzig"),
        ("leipzig", "RB Leipzig"),
        // Ligue 1
        ("paris sg", "Paris Saint-Germain"),
        ("psg", "Paris Saint-Germain"),
        ("st etienne", "Saint-Etienne"),
        ("marseille", "Olympique Marseille"),
        ("lyon", "Olympique Lyonnais"),
    ]
    .into_iter()
    .collect()
});

/// Canonical display label for a raw team name. Unmapped names come back
/// trimmed but otherwise unchanged.
pub fn display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let key = trimmed.to_lowercase();
    match CANONICAL_NAMES.get(key.as_str()) {
        Some(label) => (*label).to_string(),
        None => trimmed.to_string(),
    }
}

/// A team option for pickers: the stored value plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamLabel {
    pub value: String,
    pub label: String,
}

impl TeamLabel {
    pub fn new(raw: &str) -> Self {
        Self {
            value: raw.to_string(),
            label: display_name(raw),
        }
    }
}
