use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub categories: Vec<SuggestionCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub suggestions: Vec<String>,
}

impl SuggestionCategory {
    /// Pick up to `count` distinct suggestions, skipping any in `exclusions`.
    pub fn random_suggestions(&self, count: usize, exclusions: &HashSet<String>) -> Vec<String> {
        let available: Vec<&String> = self
            .suggestions
            .iter()
            .filter(|s| !exclusions.contains(*s))
            .collect();

        let mut rng = rand::thread_rng();
        available
            .choose_multiple(&mut rng, count)
            .map(|s| (*s).clone())
            .collect()
    }
}
