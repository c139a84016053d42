mod cannon;
mod obstacle;
mod projectile;

// Re-export all public types
pub use cannon::Cannon;
pub use obstacle::Obstacle;
pub use projectile::Projectile;

use std::fmt;

/// Identity of a projectile or obstacle, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
