use crate::id::InstanceId;

use serde::{Deserialize, Serialize};

/// The contiguous range of instance ids currently permitted to make
/// acceptance progress: `[first, first + max_instances)`. Bounds how far
/// ahead of the commit frontier speculative state may grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceWindow {
    first: InstanceId,
    max_instances: u64,
}

impl InstanceWindow {
    #[must_use]
    pub const fn new(first: InstanceId, max_instances: u64) -> Self {
        Self { first, max_instances }
    }

    #[must_use]
    pub const fn first(&self) -> InstanceId {
        self.first
    }

    #[must_use]
    pub fn contains(&self, id: InstanceId) -> bool {
        self.first <= id && id < self.first.advance(self.max_instances)
    }

    /// Moves the frontier forward once instances below `first` have been
    /// retired by the execution stage. The frontier never moves backwards.
    pub fn advance_to(&mut self, first: InstanceId) {
        mpax_utils::cmp::max_assign(&mut self.first, first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let w = InstanceWindow::new(InstanceId::from(10), 5);
        assert!(!w.contains(InstanceId::from(9)));
        assert!(w.contains(InstanceId::from(10)));
        assert!(w.contains(InstanceId::from(14)));
        assert!(!w.contains(InstanceId::from(15)));
    }

    #[test]
    fn frontier_never_regresses() {
        let mut w = InstanceWindow::new(InstanceId::from(10), 5);
        w.advance_to(InstanceId::from(8));
        assert_eq!(w.first(), InstanceId::from(10));
        w.advance_to(InstanceId::from(12));
        assert_eq!(w.first(), InstanceId::from(12));
    }
}
