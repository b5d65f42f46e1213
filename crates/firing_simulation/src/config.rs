//! Конфигурация: арсенал (RON) + параметры симуляции
//!
//! Пример `armory.ron`:
//! ```ron
//! (
//!     weapons: {
//!         "rifle": (fire_mode: Burst(size: 3, interval: 0.25, error_escalation_per_shot: 1.5)),
//!         "launcher": (projectile_type: Projectile, projectile_kind: "rocket"),
//!     },
//!     projectiles: {
//!         "rocket": (physics: Engine, max_lifetime: 10.0),
//!     },
//! )
//! ```

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projectile::ProjectileConfig;
use crate::weapon::{ProjectileType, WeaponConfig};

/// Все оружия и снаряды одного набора
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    pub weapons: HashMap<String, WeaponConfig>,
    pub projectiles: HashMap<String, ProjectileConfig>,
}

impl ArmoryConfig {
    /// Парсинг + полная валидация
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let armory: ArmoryConfig = ron::de::from_str(source)?;
        armory.validate()?;
        Ok(armory)
    }

    /// Загрузка из файла
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Встроенный демо-набор (presets)
    pub fn demo() -> Self {
        let weapons = [
            ("pistol", WeaponConfig::pistol()),
            ("burst_rifle", WeaponConfig::burst_rifle()),
            ("beam", WeaponConfig::beam()),
            ("launcher", WeaponConfig::launcher()),
        ];
        let projectiles = [
            ("rocket", ProjectileConfig::rocket()),
            ("slug", ProjectileConfig::slug()),
        ];

        Self {
            weapons: weapons
                .into_iter()
                .map(|(name, config)| (name.to_string(), config))
                .collect(),
            projectiles: projectiles
                .into_iter()
                .map(|(name, config)| (name.to_string(), config))
                .collect(),
        }
    }

    /// Каждое оружие и снаряд валидны, projectile_kind ссылается на существующий снаряд
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, projectile) in &self.projectiles {
            projectile.validate().map_err(|source| ConfigError::Entry {
                name: name.clone(),
                source: Box::new(source),
            })?;
        }

        for (name, weapon) in &self.weapons {
            weapon.validate().map_err(|source| ConfigError::Entry {
                name: name.clone(),
                source: Box::new(source),
            })?;

            if weapon.projectile_type == ProjectileType::Projectile
                && !self.projectiles.contains_key(&weapon.projectile_kind)
            {
                return Err(ConfigError::UnknownProjectileKind {
                    weapon: name.clone(),
                    kind: weapon.projectile_kind.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Параметры драйвера симуляции
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (Гц)
    pub tick_hz: f64,
    /// Seed детерминистичного RNG
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}
