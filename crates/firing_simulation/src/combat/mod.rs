//! Combat module — ECS обвязка вокруг FSM оружия и lifecycle снарядов
//!
//! ECS ответственность:
//! - Weapon / LiveProjectile components (владеют runtime state)
//! - Fire intents → переходы FSM, tick таймеров
//! - Spawn/despawn снарядов, события выстрелов и попаданий
//!
//! Host ответственность (физический движок или тесты):
//! - HitScanBackend (raycast)
//! - ProjectileImpactReport (collision detection)
//! - Rapier step для Engine-снарядов

use bevy::prelude::*;

pub mod backend;
pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use backend::{HitScanBackend, NoHits, ProjectileCatalog, RayCaster};
pub use components::{LiveProjectile, Weapon};
pub use events::*;

/// Firing Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. process_projectile_impacts — столкновения, пришедшие с прошлого шага
/// 2. tick_projectiles — lifetime + Custom движение
/// 3. process_fire_intents — start/stop запросы
/// 4. tick_weapons — таймеры burst/continuous/cooldown, выстрелы
///
/// Снаряды, заспавненные на шаге N, начинают тикать с шага N+1.
pub struct FiringPlugin;

impl Plugin for FiringPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<FireIntent>()
            .add_event::<FireRequestRejected>()
            .add_event::<WeaponFired>()
            .add_event::<HitScanHit>()
            .add_event::<ProjectileLaunched>()
            .add_event::<ContinuousFireEffects>()
            .add_event::<ProjectileImpactReport>()
            .add_event::<ProjectileImpacted>()
            .add_event::<ProjectileDespawned>();

        // Ресурсы по умолчанию (host может переопределить до/после)
        app.init_resource::<crate::DeterministicRng>()
            .init_resource::<HitScanBackend>()
            .init_resource::<ProjectileCatalog>();

        app.add_systems(
            FixedUpdate,
            (
                systems::process_projectile_impacts,
                systems::tick_projectiles,
                systems::process_fire_intents,
                systems::tick_weapons,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
