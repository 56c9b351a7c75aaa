//! Proposer role: phase-1 promise bookkeeping. Phase-2 (issuing Accepts
//! under the won ballot) is driven by the leader machinery outside this
//! core; this module brings the node to "ready to propose".

use crate::effect::Effect;
use crate::id::{Ballot, NodeId};
use crate::msg::{Message, Prepare, Prepared};
use crate::node::Node;
use crate::store::StateStore;

use mpax_utils::cmp::max_assign;

use anyhow::Result;
use bytes::Bytes;
use ordered_vecmap::VecSet;
use tracing::{debug, trace};

/// One in-flight phase-1 round.
#[derive(Debug)]
pub struct Campaign {
    pub ballot: Ballot,
    /// Acceptors that promised this ballot, deduplicated.
    pub promised: VecSet<NodeId>,
    /// Highest accepted (ballot, value) disclosed by any promise so far.
    pub max_accepted: Option<(Ballot, Bytes)>,
}

impl<S: StateStore> Node<S> {
    /// Opens a phase-1 round under a ballot strictly above anything this
    /// node has seen, and asks every peer for a promise. The node's own
    /// acceptor promises immediately.
    pub async fn begin_campaign(&self) -> Result<Effect> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let ballot = state.ballot_acceptor.max(state.ballot_proposer).add_one();
        state.ballot_proposer = ballot;
        max_assign(&mut state.ballot_acceptor, ballot);
        self.store.save_ballots(state.ballot_acceptor, state.ballot_proposer)?;

        let mut promised = VecSet::new();
        let _ = promised.insert(self.nid);

        let max_accepted = state.last_accepted.clone();
        state.campaign = Some(Campaign { ballot, promised, max_accepted });
        state.is_leader = false;

        debug!(%ballot, "campaigning");

        let mut effect = Effect::empty();
        effect.broadcast(
            self.peers.clone(),
            Message::Prepare(Prepare { sender: self.nid, ballot }),
        );
        Ok(effect)
    }

    /// Accumulates one promise. Duplicate promises from the same acceptor
    /// and promises for abandoned ballots are ignored; a strict majority of
    /// the acceptor set makes this node leader, adopting the value from the
    /// promise with the highest accepted ballot.
    pub(crate) async fn handle_prepared(&self, msg: Prepared) -> Result<Effect> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let campaign = match state.campaign {
            Some(ref mut c) => c,
            None => {
                trace!(sender = %msg.sender, "promise without a live campaign");
                return Ok(Effect::empty());
            }
        };

        if msg.ballot != campaign.ballot {
            trace!(
                msg_ballot = %msg.ballot,
                campaign_ballot = %campaign.ballot,
                "promise for an abandoned ballot"
            );
            return Ok(Effect::empty());
        }

        if campaign.promised.insert(msg.sender).is_some() {
            debug!(sender = %msg.sender, "duplicate promise");
            return Ok(Effect::empty());
        }

        if let Some((ballot, value)) = msg.accepted {
            let better = match campaign.max_accepted {
                Some((b, _)) => ballot > b,
                None => true,
            };
            if better {
                campaign.max_accepted = Some((ballot, value));
            }
        }

        if campaign.promised.len() <= self.cluster_size() / 2 {
            return Ok(Effect::empty());
        }

        if let Some(campaign) = state.campaign.take() {
            state.is_leader = true;
            state.adopted_value = campaign.max_accepted;
            debug!(ballot = %campaign.ballot, "phase-1 quorum reached, ready to propose");
        }

        Ok(Effect::empty())
    }
}
