//! Identity and position shared by everything on the playfield.

use std::fmt;

use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids that stay unique for the lifetime of a round.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Anything with an identity and a centre point. Update behaviour is opt-in
/// per type; a helipad, for one, never moves.
pub trait GameObject {
    fn id(&self) -> EntityId;
    fn position(&self) -> Vec2;
}
