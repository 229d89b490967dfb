use serde::{Deserialize, Serialize};

use super::GoalItem;
use crate::config;

/// The four fixed thematic areas of a ward plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaId {
    Finding,
    Teaching,
    NewMembers,
    Returning,
}

impl AreaId {
    pub const ALL: [AreaId; 4] = [
        AreaId::Finding,
        AreaId::Teaching,
        AreaId::NewMembers,
        AreaId::Returning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AreaId::Finding => "finding",
            AreaId::Teaching => "teaching",
            AreaId::NewMembers => "new_members",
            AreaId::Returning => "returning",
        }
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AreaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finding" => Ok(AreaId::Finding),
            "teaching" => Ok(AreaId::Teaching),
            "new_members" => Ok(AreaId::NewMembers),
            "returning" => Ok(AreaId::Returning),
            _ => Err(format!("Invalid area id: {}", s)),
        }
    }
}

/// One area of a ward plan: fixed display metadata plus the ordered goal
/// list. Item order is insertion order and drives the displayed numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    pub id: AreaId,
    pub title: String,
    pub description: String,
    pub color: String,
    pub icon_name: String,
    #[serde(default)]
    pub items: Vec<GoalItem>,
}

impl AreaRecord {
    /// Empty record carrying the built-in display metadata for `id`.
    pub fn empty(id: AreaId) -> Self {
        let cfg = config::area_config(id);
        Self {
            id,
            title: cfg.title.to_string(),
            description: cfg.description.to_string(),
            color: cfg.color.to_string(),
            icon_name: cfg.icon_name.to_string(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&GoalItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut GoalItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Share of completed goals, 0-100. An empty area counts as 0.
    pub fn completion_percent(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        let done = self.items.iter().filter(|i| i.is_completed).count();
        done as f64 / self.items.len() as f64 * 100.0
    }
}
