//! Projectile domain — жизненный цикл снаряда после launch
//!
//! Содержит:
//! - ProjectileConfig (Engine / Custom physics, max lifetime)
//! - Projectile (Inactive → Active → Destroyed)
//! - ProjectileBody / ProjectileObserver (collaborator traits)

pub mod config;
pub mod lifecycle;


pub use config::*;
pub use lifecycle::*;
