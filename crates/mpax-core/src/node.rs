use crate::config::NodeConfig;
use crate::effect::Effect;
use crate::id::{Ballot, ClientKey, InstanceId, NodeId};
use crate::msg::{Accepted, Message, Request};
use crate::state::NodeState;
use crate::store::StateStore;

use anyhow::{ensure, Result};
use bytes::Bytes;
use ordered_vecmap::VecSet;
use tokio::sync::Mutex;
use tracing::debug;

/// One protocol node: acceptor and proposer roles sharing a single
/// `NodeState` behind one lock. Each handler call is a finite synchronous
/// transition; outbound descriptors are returned as data, never sent while
/// the lock is held.
pub struct Node<S: StateStore> {
    pub(crate) nid: NodeId,
    pub(crate) peers: VecSet<NodeId>,
    pub(crate) state: Mutex<NodeState>,
    pub(crate) store: S,
}

impl<S: StateStore> Node<S> {
    pub fn new(nid: NodeId, peers: VecSet<NodeId>, config: &NodeConfig, store: S) -> Result<Self> {
        ensure!(peers.iter().all(|&p| p != nid), "peer set must not contain this node");
        ensure!(peers.len().wrapping_add(1) >= 3, "cluster size must be at least 3");

        let (ballot_acceptor, ballot_proposer) =
            store.load_ballots()?.unwrap_or((Ballot::ZERO, Ballot::ZERO));

        let state = Mutex::new(NodeState::new(config, ballot_acceptor, ballot_proposer));

        Ok(Self { nid, peers, state, store })
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.nid
    }

    pub(crate) fn cluster_size(&self) -> usize {
        self.peers.len().wrapping_add(1)
    }

    pub async fn handle_message(&self, msg: Message) -> Result<Effect> {
        match msg {
            Message::Request(msg) => {
                self.handle_request(msg).await //
            }
            Message::Accept(msg) => {
                self.handle_accept(msg).await //
            }
            Message::Accepted(msg) => {
                self.handle_accepted(msg).await //
            }
            Message::Prepare(msg) => {
                self.handle_prepare(msg).await //
            }
            Message::Prepared(msg) => {
                self.handle_prepared(msg).await //
            }
        }
    }

    /// Client-facing capability: the client pushes one opaque request.
    /// Handled locally like any direct delivery, then fanned out so every
    /// acceptor can reconcile it against the leader's ordering decision.
    pub async fn submit_request(&self, key: ClientKey, payload: Bytes) -> Result<Effect> {
        let request = Request { key, payload };
        let mut effect = self.handle_request(request.clone()).await?;
        effect.broadcast(self.peers.clone(), Message::Request(request));
        Ok(effect)
    }

    /// Acceptance acks are consumed by the proposer's phase-2 machinery and
    /// the learner, which live outside this core.
    async fn handle_accepted(&self, msg: Accepted) -> Result<Effect> {
        debug!(sender = %msg.sender, id = %msg.id, "ignoring accepted ack");
        Ok(Effect::empty())
    }

    /// Retirement hook for the external execution stage: instances below
    /// `first` are done and their bookkeeping may be dropped.
    pub async fn advance_frontier(&self, first: InstanceId) {
        let mut guard = self.state.lock().await;
        guard.advance_frontier(first);
    }

    /// Read-only view of the shared state, for observability and tests.
    pub async fn with_state<R>(&self, f: impl FnOnce(&NodeState) -> R) -> R {
        let guard = self.state.lock().await;
        f(&guard)
    }
}
