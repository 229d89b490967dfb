mod area;
mod goal;
mod plan;
mod ward;

pub use area::{AreaId, AreaRecord};
pub use goal::{next_goal_id, GoalItem, GoalPatch, NEW_GOAL_HOW};
pub use plan::WardPlan;
pub use ward::Ward;
