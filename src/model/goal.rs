use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Checklist markup a fresh goal starts with: one unchecked line.
pub const NEW_GOAL_HOW: &str = "[ ] ";

/// A single user-authored, completable, dated action entry.
///
/// `when` is a free-form display string, not a normalized date. `how` may
/// carry checklist markup lines prefixed with `"[ ] "` or `"[x] "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalItem {
    pub id: String,
    #[serde(default)]
    pub what: String,
    #[serde(default)]
    pub how: String,
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl GoalItem {
    pub fn new(id: String) -> Self {
        Self {
            id,
            what: String::new(),
            how: NEW_GOAL_HOW.to_string(),
            when: String::new(),
            is_completed: false,
        }
    }

    /// True while the checklist in `how` still has unchecked entries.
    pub fn has_pending_tasks(&self) -> bool {
        self.how.contains("[ ]")
    }

    /// Merge a field-level patch into this item.
    pub fn apply(&mut self, patch: &GoalPatch) {
        if let Some(what) = &patch.what {
            self.what = what.clone();
        }
        if let Some(how) = &patch.how {
            self.how = how.clone();
        }
        if let Some(when) = &patch.when {
            self.when = when.clone();
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
    }
}

/// Partial update of a goal item; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub what: Option<String>,
    pub how: Option<String>,
    pub when: Option<String>,
    pub is_completed: Option<bool>,
}

impl GoalPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            is_completed: Some(value),
            ..Self::default()
        }
    }
}

/// Timestamp-derived goal id, bumped past `last` so ids stay unique and
/// strictly increasing within a session even when adds land in the same
/// millisecond.
pub fn next_goal_id(last: u64) -> u64 {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    now.max(last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_goal_defaults() {
        let item = GoalItem::new("1700000000000".to_string());
        assert_eq!(item.what, "");
        assert_eq!(item.how, NEW_GOAL_HOW);
        assert_eq!(item.when, "");
        assert!(!item.is_completed);
    }

    #[test]
    fn test_pending_tasks() {
        let mut item = GoalItem::new("1".to_string());
        assert!(item.has_pending_tasks());

        item.how = "[x] visitar familia\n[x] llamar".to_string();
        assert!(!item.has_pending_tasks());

        item.how = "[x] visitar familia\n[ ] llamar".to_string();
        assert!(item.has_pending_tasks());
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut item = GoalItem::new("1".to_string());
        item.what = "Contactar familias".to_string();

        item.apply(&GoalPatch::completed(true));
        assert!(item.is_completed);
        assert_eq!(item.what, "Contactar familias");

        item.apply(&GoalPatch {
            when: Some("15 de marzo de 2026".to_string()),
            ..GoalPatch::default()
        });
        assert_eq!(item.when, "15 de marzo de 2026");
        assert!(item.is_completed);
    }

    #[test]
    fn test_camel_case_wire_keys() {
        let item = GoalItem::new("1".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("isCompleted").is_some());
        assert!(json.get("is_completed").is_none());
    }

    #[test]
    fn test_ids_strictly_increase() {
        let first = next_goal_id(0);
        let second = next_goal_id(first);
        let third = next_goal_id(second);
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_id_outruns_wall_clock() {
        let far_future = u64::MAX - 10;
        assert_eq!(next_goal_id(far_future), far_future + 1);
    }
}
