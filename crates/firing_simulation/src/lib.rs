//! Firing Simulation Core
//!
//! FSM стрельбы оружия + lifecycle снарядов.
//!
//! Слои:
//! - Ядро (без ECS): `weapon` (WeaponController), `projectile` (Projectile), `accuracy`
//! - ECS (Bevy 0.16): `combat` (components, events, systems, FiringPlugin)
//!
//! Физика, рендер, input — внешние collaborator'ы (см. `weapon::WeaponWorld`,
//! `projectile::ProjectileBody`, `combat::HitScanBackend`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod accuracy;
pub mod combat;
pub mod config;
pub mod error;
pub mod logger;
pub mod projectile;
pub mod weapon;

// Re-export основных типов для удобства
pub use accuracy::{AccuracyConfig, AngularError, MuzzlePose};
pub use combat::{
    FireAction, FireIntent, FiringPlugin, HitScanBackend, LiveProjectile, ProjectileCatalog,
    RayCaster, Weapon,
};
pub use config::{ArmoryConfig, SimulationConfig};
pub use error::{CollaboratorError, ConfigError};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use projectile::{DespawnReason, Projectile, ProjectileConfig, ProjectilePhysics};
pub use weapon::{
    FireMode, ProjectileType, WeaponConfig, WeaponController, WeaponState, WeaponStatus,
    WeaponWorld,
};

/// Главный plugin симуляции: fixed timestep, RNG, combat
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            // Детерминистичный RNG (разброс выстрелов)
            .insert_resource(DeterministicRng::new(self.config.seed))
            .insert_resource(self.config)
            .add_plugins(FiringPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(SimulationConfig::default().seed)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Арсенал уже загружен: снаряды из него попадают в `ProjectileCatalog`.
pub fn create_headless_app(config: SimulationConfig, armory: &ArmoryConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin { config })
        .insert_resource(ProjectileCatalog::from_armory(armory));

    app
}
