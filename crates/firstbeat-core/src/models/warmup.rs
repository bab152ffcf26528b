use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarmUpCategory {
    Physical,
    Vocal,
    Mental,
    Group,
}

impl WarmUpCategory {
    pub const ALL: [WarmUpCategory; 4] = [
        WarmUpCategory::Physical,
        WarmUpCategory::Vocal,
        WarmUpCategory::Mental,
        WarmUpCategory::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WarmUpCategory::Physical => "Physical",
            WarmUpCategory::Vocal => "Vocal",
            WarmUpCategory::Mental => "Mental",
            WarmUpCategory::Group => "Group",
        }
    }
}

impl fmt::Display for WarmUpCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmUp {
    pub name: String,
    pub category: WarmUpCategory,
    pub description: String,
    pub how_to_play: String,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl WarmUp {
    /// Filter a catalog down to one category, keeping catalog order.
    pub fn in_category(warm_ups: &[WarmUp], category: WarmUpCategory) -> Vec<&WarmUp> {
        warm_ups.iter().filter(|w| w.category == category).collect()
    }

    /// Sections in `WarmUpCategory::ALL` order; empty categories are left out.
    pub fn by_category(warm_ups: &[WarmUp]) -> Vec<(WarmUpCategory, Vec<&WarmUp>)> {
        WarmUpCategory::ALL
            .iter()
            .map(|&category| (category, Self::in_category(warm_ups, category)))
            .filter(|(_, section)| !section.is_empty())
            .collect()
    }
}
