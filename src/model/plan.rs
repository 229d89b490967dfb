use serde::{Deserialize, Serialize};

use super::{AreaId, AreaRecord, GoalItem, GoalPatch};

/// A ward's full plan: exactly the four well-known areas.
///
/// Each area is independently optional on the wire; a missing key reads
/// back as an empty area rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardPlan {
    #[serde(default = "empty_finding")]
    pub finding: AreaRecord,
    #[serde(default = "empty_teaching")]
    pub teaching: AreaRecord,
    #[serde(default = "empty_new_members")]
    pub new_members: AreaRecord,
    #[serde(default = "empty_returning")]
    pub returning: AreaRecord,
}

fn empty_finding() -> AreaRecord {
    AreaRecord::empty(AreaId::Finding)
}

fn empty_teaching() -> AreaRecord {
    AreaRecord::empty(AreaId::Teaching)
}

fn empty_new_members() -> AreaRecord {
    AreaRecord::empty(AreaId::NewMembers)
}

fn empty_returning() -> AreaRecord {
    AreaRecord::empty(AreaId::Returning)
}

impl Default for WardPlan {
    fn default() -> Self {
        Self::empty()
    }
}

impl WardPlan {
    /// Plan with all four areas present and no goals.
    pub fn empty() -> Self {
        Self {
            finding: empty_finding(),
            teaching: empty_teaching(),
            new_members: empty_new_members(),
            returning: empty_returning(),
        }
    }

    pub fn area(&self, id: AreaId) -> &AreaRecord {
        match id {
            AreaId::Finding => &self.finding,
            AreaId::Teaching => &self.teaching,
            AreaId::NewMembers => &self.new_members,
            AreaId::Returning => &self.returning,
        }
    }

    pub fn area_mut(&mut self, id: AreaId) -> &mut AreaRecord {
        match id {
            AreaId::Finding => &mut self.finding,
            AreaId::Teaching => &mut self.teaching,
            AreaId::NewMembers => &mut self.new_members,
            AreaId::Returning => &mut self.returning,
        }
    }

    /// Append a fresh goal with default fields to `area`.
    pub fn add_item(&mut self, area: AreaId, id: String) {
        self.area_mut(area).items.push(GoalItem::new(id));
    }

    /// Merge a patch into the goal matching `item_id`.
    ///
    /// Returns false without error when the id is absent: a deletion may
    /// race an in-flight edit.
    pub fn update_item(&mut self, area: AreaId, item_id: &str, patch: &GoalPatch) -> bool {
        match self.area_mut(area).item_mut(item_id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the goal matching `item_id`. False if already gone.
    pub fn remove_item(&mut self, area: AreaId, item_id: &str) -> bool {
        let items = &mut self.area_mut(area).items;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        items.len() != before
    }

    /// Total goals across all areas.
    pub fn goal_count(&self) -> usize {
        AreaId::ALL.iter().map(|a| self.area(*a).items.len()).sum()
    }
}
