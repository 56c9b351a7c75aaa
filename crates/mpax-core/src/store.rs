use crate::id::{Ballot, InstanceId};

use mpax_utils::codec;

use anyhow::Result;
use bytes::Bytes;
use fnv::FnvHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// The durability seam. Ballot and instance state must survive restart;
/// handlers persist through this trait before any `Accepted` descriptor is
/// emitted.
pub trait StateStore: Send + Sync + 'static {
    fn save_ballots(&self, acceptor: Ballot, proposer: Ballot) -> Result<()>;
    fn load_ballots(&self) -> Result<Option<(Ballot, Ballot)>>;

    fn save_instance(&self, id: InstanceId, ins: &SavedInstance) -> Result<()>;
    fn load_instance(&self, id: InstanceId) -> Result<Option<SavedInstance>>;
}

impl<S: StateStore> StateStore for std::sync::Arc<S> {
    fn save_ballots(&self, acceptor: Ballot, proposer: Ballot) -> Result<()> {
        S::save_ballots(self, acceptor, proposer)
    }

    fn load_ballots(&self) -> Result<Option<(Ballot, Ballot)>> {
        S::load_ballots(self)
    }

    fn save_instance(&self, id: InstanceId, ins: &SavedInstance) -> Result<()> {
        S::save_instance(self, id, ins)
    }

    fn load_instance(&self, id: InstanceId) -> Result<Option<SavedInstance>> {
        S::load_instance(self, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedInstance {
    pub ballot: Ballot,
    pub value: Bytes,
    pub accepted: bool,
}

/// In-memory store holding bincode-encoded records. Stands in for the
/// write-ahead log in tests and single-process setups.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    ballots: Option<Bytes>,
    instances: FnvHashMap<InstanceId, Bytes>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemStore {
    fn save_ballots(&self, acceptor: Ballot, proposer: Ballot) -> Result<()> {
        let bytes = codec::serialize(&(acceptor, proposer))?;
        self.inner.lock().ballots = Some(bytes);
        Ok(())
    }

    fn load_ballots(&self) -> Result<Option<(Ballot, Ballot)>> {
        let guard = self.inner.lock();
        match guard.ballots {
            Some(ref bytes) => Ok(Some(codec::deserialize_owned(bytes)?)),
            None => Ok(None),
        }
    }

    fn save_instance(&self, id: InstanceId, ins: &SavedInstance) -> Result<()> {
        let bytes = codec::serialize(ins)?;
        let _ = self.inner.lock().instances.insert(id, bytes);
        Ok(())
    }

    fn load_instance(&self, id: InstanceId) -> Result<Option<SavedInstance>> {
        let guard = self.inner.lock();
        match guard.instances.get(&id) {
            Some(bytes) => Ok(Some(codec::deserialize_owned(bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ballots_survive_reload() {
        let store = MemStore::new();
        assert!(store.load_ballots().unwrap().is_none());

        store.save_ballots(Ballot::from(7), Ballot::from(3)).unwrap();
        let (acceptor, proposer) = store.load_ballots().unwrap().unwrap();
        assert_eq!(acceptor, Ballot::from(7));
        assert_eq!(proposer, Ballot::from(3));
    }

    #[test]
    fn instance_roundtrip() {
        let store = MemStore::new();
        let id = InstanceId::from(4);

        let ins = SavedInstance {
            ballot: Ballot::from(2),
            value: Bytes::from_static(b"digest"),
            accepted: true,
        };
        store.save_instance(id, &ins).unwrap();
        assert_eq!(store.load_instance(id).unwrap().unwrap(), ins);
        assert!(store.load_instance(InstanceId::from(5)).unwrap().is_none());
    }
}
