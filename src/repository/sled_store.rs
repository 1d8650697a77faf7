use super::{GroupGuard, GroupLocks, GroupRepository};
use crate::error::RepositoryError;
use crate::ids::GroupId;
use crate::model::{GroupPatch, GroupRecord};
use sled::Tree;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

const SANTA_TREE: &str = "santas";

/// Repository persisting each group as one CBOR value keyed by its id.
///
/// sled holds a file lock on the database directory, so this process is the
/// only writer and the in-process group locks are enough to serialise
/// read-modify-write sequences.
pub struct SledRepository {
    instance: Arc<sled::Db>,
    santas: Tree,
    locks: GroupLocks,
}

impl SledRepository {
    pub fn new(instance: Arc<sled::Db>) -> Result<Self, RepositoryError> {
        let santas = instance.open_tree(SANTA_TREE)?;
        Ok(Self {
            instance,
            santas,
            locks: GroupLocks::new(),
        })
    }

    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        Self::new(Arc::new(sled::open(path)?))
    }

    /// Block until all written groups are durable on disk.
    pub fn flush(&self) -> Result<(), RepositoryError> {
        self.instance.flush()?;
        Ok(())
    }

    fn save(&self, group: &GroupRecord) -> Result<(), RepositoryError> {
        let cbor = minicbor::to_vec(group).map_err(|e| RepositoryError::Storage(e.to_string()))?;
        self.santas.insert(group.id.as_str().as_bytes(), cbor)?;
        Ok(())
    }
}

impl GroupRepository for SledRepository {
    fn get(&self, id: &GroupId) -> Result<GroupRecord, RepositoryError> {
        let bytes = self
            .santas
            .get(id.as_str().as_bytes())?
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })?;

        minicbor::decode(&bytes).map_err(|e| {
            error!(group_id = %id, error = %e, "stored santa could not be decoded");
            RepositoryError::Corrupted {
                key: id.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn create(&self, group: GroupRecord) -> Result<GroupRecord, RepositoryError> {
        debug!(group_id = %group.id, "storing new santa in sled");
        self.save(&group)?;
        Ok(group)
    }

    fn update(&self, id: &GroupId, patch: GroupPatch) -> Result<GroupRecord, RepositoryError> {
        let updated = self.get(id)?.apply(patch);
        self.save(&updated)?;
        Ok(updated)
    }

    fn lock_group(&self, id: &GroupId) -> GroupGuard<'_> {
        self.locks.lock(id)
    }
}
