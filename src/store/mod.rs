//! Durable ward storage: keyed plans plus a passphrase lookup.

mod memory;
mod sqlite;

pub use memory::MemoryWardStore;
pub use sqlite::SqliteWardStore;

use async_trait::async_trait;

use crate::config::WardSeed;
use crate::error::Result;
use crate::model::{Ward, WardPlan};

/// Keyed storage of ward plans with passphrase-based lookup.
///
/// Plan replacement is last-write-wins: a full-document overwrite with no
/// merge and no version check. Concurrent editors of the same ward can
/// silently clobber each other's racing snapshots; callers accept this by
/// contract. The two shipped backends ([`SqliteWardStore`] and
/// [`MemoryWardStore`]) are alternatives, not layers.
#[async_trait]
pub trait WardStore: Send + Sync {
    /// Ensure the schema exists and seed the ward table on first run.
    ///
    /// Idempotent insert-ignore: existing wards are never renamed, their
    /// passphrases never overwritten, their plans never reset, so a
    /// racing cold-start invocation is harmless.
    async fn initialize(&self, seeds: &[WardSeed]) -> Result<()>;

    /// Exact, case-sensitive passphrase match. No normalization, no rate
    /// limiting; the shared-secret model is as strong as its secrecy.
    async fn find_by_passphrase(&self, candidate: &str) -> Result<Option<Ward>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Ward>>;

    /// Fully overwrite the stored plan for `id`.
    async fn replace_plan(&self, id: &str, plan: &WardPlan) -> Result<()>;

    /// All wards, ordered by id.
    async fn list(&self) -> Result<Vec<Ward>>;
}
