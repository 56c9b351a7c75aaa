use crate::id::{Ballot, InstanceId, NodeId};

use serde::{Deserialize, Serialize};

/// Completeness gate for one instance: how many of the batch's requests
/// have been resolved at this acceptor.
///
/// Invariants: `received <= total`; `accepted` becomes true exactly once,
/// when `received == total`, and never resets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceProgress {
    pub id: InstanceId,
    /// Which node's Accept created this entry; the `Accepted` ack goes back
    /// to it even when the completing request arrives from a client.
    pub proposer: NodeId,
    /// Ballot the ordering decision was carried under.
    pub ballot: Ballot,
    pub received: usize,
    pub total: usize,
    pub accepted: bool,
}

impl InstanceProgress {
    #[must_use]
    pub const fn new(id: InstanceId, proposer: NodeId, ballot: Ballot) -> Self {
        Self { id, proposer, ballot, received: 0, total: 0, accepted: false }
    }

    /// True iff the gate just closed in this call. Re-entry after the
    /// instance is accepted is guarded: repeated completing information
    /// never fires twice.
    pub fn try_accept(&mut self) -> bool {
        debug_assert!(self.received <= self.total);
        if self.accepted {
            return false;
        }
        if self.received == self.total {
            self.accepted = true;
            return true;
        }
        false
    }
}
