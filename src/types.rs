use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    /// Free-form win-loss-draw text, e.g. "27-1-0".
    pub record: String,
    /// URL of the flag image.
    pub country: String,
    /// URL of the portrait image.
    pub picture: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fight {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub weight: String,
    #[serde(rename = "fighterA")]
    pub fighter_a: Fighter,
    #[serde(rename = "fighterB")]
    pub fighter_b: Fighter,
}

/// One fight card.
///
/// The `id` is minted on every decode and never crosses the wire, so
/// equality is identity: a clone equals its source, but decoding the same
/// JSON twice yields two unequal events. Compare `title`/`date`/`fights`
/// yourself if you need logical equivalence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub date: String,
    pub fights: Vec<Fight>,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub data: Vec<Event>,
}
