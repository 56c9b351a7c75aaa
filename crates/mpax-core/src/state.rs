use crate::config::NodeConfig;
use crate::id::{Ballot, InstanceId};
use crate::ins::InstanceProgress;
use crate::proposer::Campaign;
use crate::req::RequestTable;
use crate::window::InstanceWindow;

use bytes::Bytes;
use fnv::FnvHashMap;

/// The single mutable aggregate every handler reads and writes. Handlers
/// are finite synchronous transitions `(message, &mut NodeState) -> Effect`;
/// no role holds conflicting copies of any of this.
pub struct NodeState {
    /// The acceptor's promise: no ordering decision below this ballot is
    /// ever accepted.
    pub ballot_acceptor: Ballot,
    /// The ballot this node last campaigned under.
    pub ballot_proposer: Ballot,
    pub is_leader: bool,
    pub window: InstanceWindow,
    pub requests: RequestTable,
    pub progress: FnvHashMap<InstanceId, InstanceProgress>,
    /// Opaque per-instance metadata (the chosen value/digest).
    pub values: FnvHashMap<InstanceId, Bytes>,
    /// Live phase-1 round, if this node is campaigning.
    pub campaign: Option<Campaign>,
    /// Highest accepted (ballot, value) pair, disclosed in promises.
    pub last_accepted: Option<(Ballot, Bytes)>,
    /// Value recovered by a won phase-1 round; the phase-2 machinery must
    /// propose it before anything new (standard value-recovery rule).
    pub adopted_value: Option<(Ballot, Bytes)>,
}

impl NodeState {
    #[must_use]
    pub fn new(config: &NodeConfig, ballot_acceptor: Ballot, ballot_proposer: Ballot) -> Self {
        Self {
            ballot_acceptor,
            ballot_proposer,
            is_leader: false,
            window: InstanceWindow::new(InstanceId::ONE, config.max_instances),
            requests: RequestTable::default(),
            progress: FnvHashMap::default(),
            values: FnvHashMap::default(),
            campaign: None,
            last_accepted: None,
            adopted_value: None,
        }
    }

    /// Retires everything below the new frontier. Called when the external
    /// execution stage reports instances executed; retirement policy itself
    /// lives there, not here.
    pub fn advance_frontier(&mut self, first: InstanceId) {
        self.window.advance_to(first);
        let first = self.window.first();
        self.progress.retain(|&id, _| id >= first);
        self.values.retain(|&id, _| id >= first);
        self.requests.retain(|_, record| match record.id {
            Some(id) => id >= first,
            None => true,
        });
    }
}
