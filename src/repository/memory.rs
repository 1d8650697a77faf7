use super::{GroupGuard, GroupLocks, GroupRepository};
use crate::error::RepositoryError;
use crate::ids::GroupId;
use crate::model::{GroupPatch, GroupRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Process-local repository backed by a map.
#[derive(Default)]
pub struct InMemoryRepository {
    groups: RwLock<HashMap<GroupId, GroupRecord>>,
    locks: GroupLocks,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

impl GroupRepository for InMemoryRepository {
    fn get(&self, id: &GroupId) -> Result<GroupRecord, RepositoryError> {
        self.groups
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })
    }

    fn create(&self, group: GroupRecord) -> Result<GroupRecord, RepositoryError> {
        debug!(group_id = %group.id, "storing new santa in memory");
        self.groups.write().insert(group.id.clone(), group.clone());
        Ok(group)
    }

    fn update(&self, id: &GroupId, patch: GroupPatch) -> Result<GroupRecord, RepositoryError> {
        let mut groups = self.groups.write();
        let current = groups
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })?;

        let updated = current.apply(patch);
        groups.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    fn lock_group(&self, id: &GroupId) -> GroupGuard<'_> {
        self.locks.lock(id)
    }
}
