//! Combat components: оружие и живые снаряды

use bevy::prelude::*;

use crate::error::ConfigError;
use crate::projectile::Projectile;
use crate::weapon::{WeaponConfig, WeaponController, WeaponStatus};

/// Оружие на entity
///
/// Transform entity = muzzle pose (позиция + forward -Z).
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Weapon {
    pub controller: WeaponController,
}

impl Weapon {
    pub fn new(config: WeaponConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: WeaponController::new(config)?,
        })
    }

    pub fn status(&self) -> WeaponStatus {
        self.controller.status()
    }
}

/// Запущенный снаряд
///
/// Владеет своим lifecycle; оружие, которое его выпустило, ссылки на него
/// не держит (`shooter` — только для атрибуции попаданий).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct LiveProjectile {
    pub projectile: Projectile,
    /// Кто выстрелил
    pub shooter: Entity,
    /// Ключ в ProjectileCatalog
    pub kind: String,
}
