//! Combat events
//!
//! Входящие (host → ECS): `FireIntent`, `ProjectileImpactReport`
//! Исходящие (ECS → host): всё остальное

use bevy::prelude::*;

use crate::projectile::DespawnReason;
use crate::weapon::{RayHit, ShotFired, WeaponStatus};

/// Что хотим сделать со стрельбой
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum FireAction {
    Start,
    Stop,
}

/// Event: запрос start/stop стрельбы (input, AI)
///
/// Обрабатываются в порядке отправки.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FireIntent {
    pub weapon: Entity,
    pub action: FireAction,
}

impl FireIntent {
    pub fn start(weapon: Entity) -> Self {
        Self {
            weapon,
            action: FireAction::Start,
        }
    }

    pub fn stop(weapon: Entity) -> Self {
        Self {
            weapon,
            action: FireAction::Stop,
        }
    }
}

/// Event: переход запрещён текущим состоянием оружия
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FireRequestRejected {
    pub weapon: Entity,
    pub action: FireAction,
    /// Состояние, в котором пришёл запрос
    pub status: WeaponStatus,
}

/// Event: оружие выстрелило
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponFired {
    pub weapon: Entity,
    pub shot: ShotFired,
}

/// Event: hitscan попал
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitScanHit {
    pub weapon: Entity,
    pub hit: RayHit,
}

/// Event: снаряд заспавнен и запущен
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileLaunched {
    pub weapon: Entity,
    pub projectile: Entity,
    pub kind: String,
}

/// Event: старт/стоп continuous эффектов (звук, луч)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ContinuousFireEffects {
    pub weapon: Entity,
    pub active: bool,
}

/// Event: физика сообщает о столкновении снаряда (host → ECS)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpactReport {
    pub projectile: Entity,
    pub target: Entity,
    pub point: Vec3,
}

/// Event: столкновение принято (первое и единственное для снаряда)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpacted {
    pub projectile: Entity,
    pub shooter: Entity,
    pub target: Entity,
    pub point: Vec3,
}

/// Event: снаряд удалён
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileDespawned {
    pub projectile: Entity,
    pub shooter: Entity,
    pub reason: DespawnReason,
}
