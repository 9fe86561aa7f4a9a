//! Entity id allocation.
//!
//! # Invariants
//! - Ids returned by one generator are strictly increasing.
//! - The first id of a fresh generator is `1`.
//! - Once `EntityId::MAX` has been issued or seeded, every later request
//!   fails instead of wrapping.

use crate::model::entity::EntityId;
use crate::model::tree::{TreeError, TreeResult};

/// Monotonic id source shared by boards, lists and tasks.
///
/// Passed explicitly into every tree mutation that creates an entity, so
/// tests can start from a known state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: EntityId,
}

impl IdGenerator {
    /// Creates a generator whose first id is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first id is `last + 1`.
    ///
    /// Negative values are clamped to zero.
    pub fn starting_after(last: EntityId) -> Self {
        Self { last: last.max(0) }
    }

    /// Allocates the next id.
    ///
    /// # Errors
    /// - `TreeError::IdsExhausted` when `EntityId::MAX` was already reached.
    pub fn next_id(&mut self) -> TreeResult<EntityId> {
        let next = self.last.checked_add(1).ok_or(TreeError::IdsExhausted)?;
        self.last = next;
        Ok(next)
    }

    /// Last id handed out (or seeded), `0` when none.
    pub fn last_issued(&self) -> EntityId {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::IdGenerator;
    use crate::model::entity::EntityId;
    use crate::model::tree::TreeError;

    #[test]
    fn ids_are_distinct_and_increasing() {
        let mut ids = IdGenerator::new();
        let issued: Vec<_> = (0..64).map(|_| ids.next_id().unwrap()).collect();
        assert_eq!(issued.first(), Some(&1));
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.last_issued(), 64);
    }

    #[test]
    fn starting_after_skips_seeded_range() {
        let mut ids = IdGenerator::starting_after(41);
        assert_eq!(ids.next_id().unwrap(), 42);

        let mut clamped = IdGenerator::starting_after(-5);
        assert_eq!(clamped.next_id().unwrap(), 1);
    }

    #[test]
    fn exhausted_generator_errors_without_moving() {
        let mut ids = IdGenerator::starting_after(EntityId::MAX - 1);
        assert_eq!(ids.next_id().unwrap(), EntityId::MAX);

        assert_eq!(ids.next_id().unwrap_err(), TreeError::IdsExhausted);
        assert_eq!(ids.next_id().unwrap_err(), TreeError::IdsExhausted);
        assert_eq!(ids.last_issued(), EntityId::MAX);
    }
}
