use crate::id::{Ballot, ClientKey, InstanceId, NodeId};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Direct client delivery of one raw request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub key: ClientKey,
    pub payload: Bytes,
}

/// The leader's ordering decision: the batch of client requests chosen for
/// instance `id`. A payload slot is `None` when the leader believes this
/// node already holds the request via direct client delivery.
///
/// `keys.len() == payloads.len()` is a hard contract; a mismatch indicates
/// a transport/encoding bug upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accept {
    pub sender: NodeId,
    pub ballot: Ballot,
    pub id: InstanceId,
    pub keys: Vec<ClientKey>,
    pub payloads: Vec<Option<Bytes>>,
    /// Opaque instance metadata (the chosen value/digest).
    pub value: Bytes,
}

/// Acceptance acknowledgement: every request promised for instance `id`
/// has been resolved at the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accepted {
    pub sender: NodeId,
    pub id: InstanceId,
}

/// Phase-1 ballot acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prepare {
    pub sender: NodeId,
    pub ballot: Ballot,
}

/// Phase-1 promise, disclosing the highest previously-accepted
/// (ballot, value) pair, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prepared {
    pub sender: NodeId,
    pub ballot: Ballot,
    pub accepted: Option<(Ballot, Bytes)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    Request(Request),
    Accept(Accept),
    Accepted(Accepted),
    Prepare(Prepare),
    Prepared(Prepared),
}
