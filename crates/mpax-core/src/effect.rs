use crate::id::NodeId;
use crate::msg::Message;

use ordered_vecmap::VecSet;

/// Outbound descriptors produced by a handler, dispatched to the transport
/// by a separate stage. An empty effect is the explicit no-op outcome of
/// every protocol-expected rejection.
#[derive(Debug, Default)]
pub struct Effect {
    pub replies: Vec<Reply>,
    pub broadcasts: Vec<Broadcast>,
}

#[derive(Debug)]
pub struct Reply {
    pub target: NodeId,
    pub msg: Message,
}

#[derive(Debug)]
pub struct Broadcast {
    pub targets: VecSet<NodeId>,
    pub msg: Message,
}

impl Effect {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty() && self.broadcasts.is_empty()
    }

    pub fn reply(&mut self, target: NodeId, msg: Message) {
        self.replies.push(Reply { target, msg });
    }

    pub fn broadcast(&mut self, targets: VecSet<NodeId>, msg: Message) {
        self.broadcasts.push(Broadcast { targets, msg });
    }
}
