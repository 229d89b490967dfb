use serde::{Deserialize, Serialize};

use super::WardPlan;

/// An isolated tenant scope: one ward, one shared passphrase, one plan.
///
/// Wards are seeded once at provisioning and never deleted; only the plan
/// changes afterwards. The passphrase is stored and compared as plaintext
/// (a documented weakness of the shared-secret model, kept as is).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: String,
    pub name: String,
    pub passphrase: String,
    pub plan: WardPlan,
}
