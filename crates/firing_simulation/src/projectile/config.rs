//! ProjectileConfig — параметры снаряда (prefab)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{positive, ConfigError};

/// Кто двигает снаряд
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ProjectilePhysics {
    /// Физ. движок: один velocity change при launch, дальше — rigid body
    #[default]
    Engine,
    /// Своя интеграция: `position += direction * speed * dt` каждый tick
    Custom,
}

/// Параметры снаряда
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub physics: ProjectilePhysics,
    /// Время жизни после launch (секунды)
    pub max_lifetime: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            physics: ProjectilePhysics::Engine,
            max_lifetime: 30.0,
        }
    }
}

impl ProjectileConfig {
    /// Ракета: rigid body, 10 секунд
    pub fn rocket() -> Self {
        Self {
            physics: ProjectilePhysics::Engine,
            max_lifetime: 10.0,
        }
    }

    /// Болванка: прямолинейный полёт без физики, 5 секунд
    pub fn slug() -> Self {
        Self {
            physics: ProjectilePhysics::Custom,
            max_lifetime: 5.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_lifetime", self.max_lifetime)
    }
}
