use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub player_count: Option<String>,
    #[serde(default)]
    pub setup_time: Option<String>,
}

impl Opening {
    pub fn display_player_count(&self) -> &str {
        self.player_count.as_deref().unwrap_or("Any")
    }
}
