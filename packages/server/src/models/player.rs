use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub confirmed: bool,
    pub alive: bool,
}

impl Player {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            confirmed: false,
            alive: true,
        }
    }

    /// Chat-platform mention for this player.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
