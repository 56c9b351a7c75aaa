use crate::id::{ClientKey, InstanceId};

use bytes::Bytes;
use fnv::FnvHashMap;
use tracing::warn;

/// One client request as seen by this node. The payload and the leader's
/// instance assignment arrive independently and in either order; the record
/// is resolved once both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub id: Option<InstanceId>,
    pub payload: Option<Bytes>,
}

impl RequestRecord {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.id.is_some() && self.payload.is_some()
    }
}

/// Outcome of feeding one piece of information into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The record became resolved in this pass, under this assignment.
    Resolved(InstanceId),
    /// The record is still missing its complementary piece.
    Pending,
    /// Retransmission carrying nothing new.
    Duplicate,
}

pub type RequestTable = FnvHashMap<ClientKey, RequestRecord>;

/// Applies one slot of an Accept batch to the table.
///
/// When the payload is carried inline the record is upserted whole. When it
/// is omitted the leader believes this node already holds the request; an
/// unknown key, or a key whose assignment the window has since passed, gets
/// a fresh unresolved record instead of a fabricated resolution.
pub fn assign_slot(
    table: &mut RequestTable,
    first: InstanceId,
    id: InstanceId,
    key: ClientKey,
    payload: Option<Bytes>,
) -> SlotOutcome {
    if let Some(payload) = payload {
        let record = RequestRecord { id: Some(id), payload: Some(payload) };
        let _ = table.insert(key, record);
        return SlotOutcome::Resolved(id);
    }

    let stale = |record: &RequestRecord| matches!(record.id, Some(old) if old < first);

    match table.get_mut(&key) {
        None => {
            let _ = table.insert(key, RequestRecord { id: Some(id), payload: None });
            SlotOutcome::Pending
        }
        Some(record) if stale(record) => {
            *record = RequestRecord { id: Some(id), payload: None };
            SlotOutcome::Pending
        }
        Some(record) if record.payload.is_some() && record.id.is_none() => {
            record.id = Some(id);
            SlotOutcome::Resolved(id)
        }
        Some(_) => {
            warn!(?key, %id, "slot already resolved, duplicated accept?");
            SlotOutcome::Duplicate
        }
    }
}

/// Applies a directly-delivered client payload to the table.
///
/// Resolves a record an instance is already waiting on, parks the payload
/// when no assignment has been seen yet, and drops client resends of an
/// already-known payload so they are never double-counted.
pub fn deliver_payload(
    table: &mut RequestTable,
    first: InstanceId,
    key: ClientKey,
    payload: Bytes,
) -> SlotOutcome {
    let stale = |record: &RequestRecord| matches!(record.id, Some(old) if old < first);

    match table.get_mut(&key) {
        None => {
            let _ = table.insert(key, RequestRecord { id: None, payload: Some(payload) });
            SlotOutcome::Pending
        }
        Some(record) if record.payload.is_some() => SlotOutcome::Duplicate,
        Some(record) if stale(record) => {
            *record = RequestRecord { id: None, payload: Some(payload) };
            SlotOutcome::Pending
        }
        Some(record) => {
            record.payload = Some(payload);
            match record.id {
                Some(id) => SlotOutcome::Resolved(id),
                None => SlotOutcome::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::id::{ClientId, ReqStamp};

    fn key(c: u64, t: u64) -> ClientKey {
        ClientKey(ClientId::from(c), ReqStamp::from(t))
    }

    #[test]
    fn inline_payload_resolves() {
        let mut table = RequestTable::default();
        let first = InstanceId::ONE;
        let id = InstanceId::from(3);

        let outcome = assign_slot(&mut table, first, id, key(1, 1), Some(Bytes::from_static(b"r")));
        assert_eq!(outcome, SlotOutcome::Resolved(id));
        assert!(table[&key(1, 1)].is_resolved());
    }

    #[test]
    fn either_order_resolves_once() {
        let k = key(1, 2);
        let first = InstanceId::ONE;
        let id = InstanceId::from(5);
        let payload = Bytes::from_static(b"r");

        // payload first, then assignment
        let mut t1 = RequestTable::default();
        assert_eq!(deliver_payload(&mut t1, first, k, payload.clone()), SlotOutcome::Pending);
        assert_eq!(assign_slot(&mut t1, first, id, k, None), SlotOutcome::Resolved(id));

        // assignment first, then payload
        let mut t2 = RequestTable::default();
        assert_eq!(assign_slot(&mut t2, first, id, k, None), SlotOutcome::Pending);
        assert_eq!(deliver_payload(&mut t2, first, k, payload), SlotOutcome::Resolved(id));

        assert_eq!(t1[&k], t2[&k]);
    }

    #[test]
    fn client_resend_is_not_double_counted() {
        let k = key(2, 1);
        let first = InstanceId::ONE;
        let mut table = RequestTable::default();

        assert_eq!(
            deliver_payload(&mut table, first, k, Bytes::from_static(b"r")),
            SlotOutcome::Pending
        );
        assert_eq!(
            deliver_payload(&mut table, first, k, Bytes::from_static(b"r")),
            SlotOutcome::Duplicate
        );
    }

    #[test]
    fn stale_assignment_is_replaced() {
        let k = key(3, 1);
        let mut table = RequestTable::default();
        let _ = table.insert(k, RequestRecord { id: Some(InstanceId::from(2)), payload: None });

        // window has advanced past the old assignment
        let first = InstanceId::from(10);
        let id = InstanceId::from(12);
        assert_eq!(assign_slot(&mut table, first, id, k, None), SlotOutcome::Pending);
        assert_eq!(table[&k].id, Some(id));
        assert_eq!(table[&k].payload, None);
    }

    #[test]
    fn duplicate_assignment_is_ignored() {
        let k = key(4, 1);
        let first = InstanceId::ONE;
        let id = InstanceId::from(4);
        let mut table = RequestTable::default();

        let _ = assign_slot(&mut table, first, id, k, Some(Bytes::from_static(b"r")));
        assert_eq!(assign_slot(&mut table, first, id, k, None), SlotOutcome::Duplicate);
    }
}
