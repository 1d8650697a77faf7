use crate::ids::GroupId;
use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;
use tracing::trace;

/// Tracks which groups are inside a read-modify-write. Only ids currently
/// held are stored, so the set never outgrows the number of in-flight calls.
#[derive(Default)]
pub struct GroupLocks {
    held: Mutex<HashSet<GroupId>>,
    released: Condvar,
}

pub struct GroupGuard<'a> {
    locks: &'a GroupLocks,
    id: GroupId,
}

impl GroupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self, id: &GroupId) -> GroupGuard<'_> {
        let mut held = self.held.lock();
        while held.contains(id) {
            trace!(group_id = %id, "waiting for group lock");
            self.released.wait(&mut held);
        }
        held.insert(id.clone());

        GroupGuard {
            locks: self,
            id: id.clone(),
        }
    }

    pub fn is_locked(&self, id: &GroupId) -> bool {
        self.held.lock().contains(id)
    }
}

impl GroupGuard<'_> {
    pub fn group_id(&self) -> &GroupId {
        &self.id
    }
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        self.locks.held.lock().remove(&self.id);
        // waiters for other groups wake too and go back to sleep
        self.locks.released.notify_all();
    }
}
