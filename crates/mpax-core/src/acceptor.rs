//! Acceptor role: processing of ordering decisions and directly-delivered
//! client requests, under ballot and window safety.

use crate::effect::Effect;
use crate::id::InstanceId;
use crate::ins::InstanceProgress;
use crate::msg::{Accept, Accepted, Message, Prepare, Prepared, Request};
use crate::node::Node;
use crate::req::{assign_slot, deliver_payload, SlotOutcome};
use crate::state::NodeState;
use crate::store::{SavedInstance, StateStore};

use mpax_utils::cmp::max_assign;

use anyhow::{bail, ensure, Result};
use bytes::Bytes;
use tracing::{debug, trace};

impl<S: StateStore> Node<S> {
    /// Processes the leader's ordering decision for one instance.
    ///
    /// Stale ballots, out-of-window instances and leader-side self traffic
    /// are expected steady-state rejections: they complete normally with an
    /// empty effect and the leader re-proposes on its own schedule.
    pub(crate) async fn handle_accept(&self, msg: Accept) -> Result<Effect> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.is_leader {
            // our own role's late-arriving ordering traffic
            return Ok(Effect::empty());
        }

        if msg.ballot < state.ballot_acceptor {
            trace!(
                msg_ballot = %msg.ballot,
                current_ballot = %state.ballot_acceptor,
                "rejecting accept below promised ballot"
            );
            return Ok(Effect::empty());
        }

        let id = msg.id;
        if !state.window.contains(id) {
            debug!(%id, first = %state.window.first(), "rejecting accept outside window");
            return Ok(Effect::empty());
        }

        ensure!(
            msg.keys.len() == msg.payloads.len(),
            "malformed accept: {} keys but {} payload slots",
            msg.keys.len(),
            msg.payloads.len()
        );

        let Accept { sender, ballot, keys, payloads, value, .. } = msg;

        let first = state.window.first();
        let total = keys.len();
        let mut fresh: usize = 0;
        for (key, payload) in keys.into_iter().zip(payloads) {
            if let SlotOutcome::Resolved(_) = assign_slot(&mut state.requests, first, id, key, payload)
            {
                fresh = fresh.wrapping_add(1);
            }
        }

        let progress = state
            .progress
            .entry(id)
            .or_insert_with(|| InstanceProgress::new(id, sender, ballot));
        progress.proposer = sender;
        progress.ballot = ballot;
        // a redelivery of the same accept recomputes rather than accumulates
        progress.received = fresh;
        progress.total = total;

        let _ = state.values.insert(id, value);

        let mut effect = Effect::empty();
        self.check_accept(state, id, &mut effect)?;
        Ok(effect)
    }

    /// Direct client delivery of one raw request payload. This is the
    /// second call site of the acceptance check: the payload may complete
    /// an instance whose ordering decision arrived first.
    pub(crate) async fn handle_request(&self, msg: Request) -> Result<Effect> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let first = state.window.first();
        let mut effect = Effect::empty();

        match deliver_payload(&mut state.requests, first, msg.key, msg.payload) {
            SlotOutcome::Resolved(id) => {
                if let Some(progress) = state.progress.get_mut(&id) {
                    progress.received = progress.received.wrapping_add(1);
                }
                self.check_accept(state, id, &mut effect)?;
            }
            SlotOutcome::Pending => {}
            SlotOutcome::Duplicate => {
                debug!(key = ?msg.key, "ignoring client resend");
            }
        }

        Ok(effect)
    }

    /// Phase-1 ballot acquisition: never regress the promised ballot, make
    /// the promise durable, and disclose the highest accepted pair.
    pub(crate) async fn handle_prepare(&self, msg: Prepare) -> Result<Effect> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if msg.ballot < state.ballot_acceptor {
            trace!(
                msg_ballot = %msg.ballot,
                current_ballot = %state.ballot_acceptor,
                "rejecting prepare below promised ballot"
            );
            return Ok(Effect::empty());
        }

        max_assign(&mut state.ballot_acceptor, msg.ballot);
        self.store.save_ballots(state.ballot_acceptor, state.ballot_proposer)?;

        let accepted = state.last_accepted.clone();

        let mut effect = Effect::empty();
        effect.reply(
            msg.sender,
            Message::Prepared(Prepared { sender: self.nid, ballot: msg.ballot, accepted }),
        );
        Ok(effect)
    }

    /// Shared acceptance check: when every request promised for `id` has
    /// been resolved, persist the instance and emit exactly one `Accepted`
    /// ack. Re-entry after acceptance is a hard guard.
    fn check_accept(&self, state: &mut NodeState, id: InstanceId, effect: &mut Effect) -> Result<()> {
        let progress = match state.progress.get_mut(&id) {
            Some(p) => p,
            None => return Ok(()),
        };

        if !progress.try_accept() {
            return Ok(());
        }

        let ballot = progress.ballot;
        let proposer = progress.proposer;

        let value = match state.values.get(&id) {
            Some(v) => Bytes::clone(v),
            None => bail!("instance metadata missing for accepted instance {id}"),
        };

        // durable before the ack leaves this node
        let saved = SavedInstance { ballot, value: value.clone(), accepted: true };
        self.store.save_instance(id, &saved)?;

        match state.last_accepted {
            Some((b, _)) if b >= ballot => {}
            _ => state.last_accepted = Some((ballot, value)),
        }

        debug!(%id, %ballot, "instance accepted");
        effect.reply(proposer, Message::Accepted(Accepted { sender: self.nid, id }));
        Ok(())
    }
}
