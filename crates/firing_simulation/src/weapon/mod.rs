//! Weapon domain — FSM стрельбы (Single / Burst / Continuous)
//!
//! Содержит:
//! - WeaponConfig (неизменяемые параметры + FireMode)
//! - WeaponState / FiringPhase (runtime state, tagged union)
//! - WeaponController (request handlers + tick)
//! - WeaponWorld (collaborator trait: raycast, spawn, hooks)

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod state;


pub use collaborators::*;
pub use config::*;
pub use controller::WeaponController;
pub use state::*;
