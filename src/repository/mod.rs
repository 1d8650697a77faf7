//! Storage contract for santa groups.
//!
//! A repository is the single source of truth for every group. The service
//! reads a record, checks it, and writes a patch back while holding the
//! group's guard from [`GroupRepository::lock_group`], so two operations on
//! the same group never act on the same stale snapshot.
mod locks;
mod memory;
mod sled_store;

pub use locks::{GroupGuard, GroupLocks};
pub use memory::InMemoryRepository;
pub use sled_store::SledRepository;

use crate::error::RepositoryError;
use crate::ids::GroupId;
use crate::model::{GroupPatch, GroupRecord};

pub trait GroupRepository: Send + Sync {
    fn get(&self, id: &GroupId) -> Result<GroupRecord, RepositoryError>;

    /// Store a brand-new record. The id is assumed to be fresh.
    fn create(&self, group: GroupRecord) -> Result<GroupRecord, RepositoryError>;

    /// Merge `patch` into the stored record and return the result.
    fn update(&self, id: &GroupId, patch: GroupPatch) -> Result<GroupRecord, RepositoryError>;

    /// Exclusive section for read-modify-write sequences on one group.
    /// Released when the guard is dropped.
    fn lock_group(&self, id: &GroupId) -> GroupGuard<'_>;
}
