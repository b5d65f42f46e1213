//! Combat systems (FixedUpdate)

pub mod projectile;
pub mod weapon;


// Re-export all systems
pub use projectile::*;
pub use weapon::*;
