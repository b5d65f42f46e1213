//! WeaponConfig — неизменяемые параметры оружия
//!
//! Загружается один раз (preset или RON), валидируется при создании
//! `WeaponController`, в runtime не меняется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accuracy::{AccuracyConfig, MAX_ANGLE_ERROR};
use crate::error::{non_negative, positive, ConfigError};

/// Режим огня (+ параметры, относящиеся только к этому режиму)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum FireMode {
    /// Один выстрел на нажатие, затем сразу cooldown
    Single,

    /// Фиксированная очередь
    Burst {
        /// Количество выстрелов в очереди (>= 1)
        size: u32,
        /// Интервал между выстрелами (секунды)
        interval: f32,
        /// Множитель разброса за каждый следующий выстрел (>= 1.0)
        error_escalation_per_shot: f32,
    },

    /// Непрерывный огонь до `max_duration` или до stop request
    Continuous {
        /// Максимальная длительность (секунды)
        max_duration: f32,
    },
}

impl FireMode {
    /// Burst по умолчанию: 3 выстрела, 0.25s, x1.5
    pub const DEFAULT_BURST: Self = Self::Burst {
        size: 3,
        interval: 0.25,
        error_escalation_per_shot: 1.5,
    };

    /// Continuous по умолчанию: 5 секунд
    pub const DEFAULT_CONTINUOUS: Self = Self::Continuous { max_duration: 5.0 };
}

/// Как выстрел доставляется до цели
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ProjectileType {
    /// Мгновенный raycast
    #[default]
    HitScan,
    /// Физический снаряд (spawn + launch)
    Projectile,
}

/// Фильтр hitscan raycast'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct HitFilter {
    /// Битовая маска слоёв коллизий (по умолчанию — все)
    pub layers: u32,
    /// Учитывать ли trigger/sensor коллайдеры
    pub include_triggers: bool,
}

impl Default for HitFilter {
    fn default() -> Self {
        Self {
            layers: u32::MAX,
            include_triggers: false,
        }
    }
}

/// Параметры оружия
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub fire_mode: FireMode,
    pub projectile_type: ProjectileType,

    /// Дальность hitscan (метры)
    pub max_range: f32,

    /// Cooldown после окончания стрельбы (секунды)
    pub end_of_fire_cooldown: f32,

    /// Скорость снаряда при launch (м/с)
    pub projectile_launch_speed: f32,

    /// Какой снаряд спавнить (ключ в `ProjectileCatalog`)
    pub projectile_kind: String,

    pub hit_filter: HitFilter,
    pub accuracy: AccuracyConfig,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_mode: FireMode::Single,
            projectile_type: ProjectileType::HitScan,
            max_range: 50.0,
            end_of_fire_cooldown: 0.0,
            projectile_launch_speed: 20.0,
            projectile_kind: String::new(),
            hit_filter: HitFilter::default(),
            accuracy: AccuracyConfig::default(),
        }
    }
}

impl WeaponConfig {
    /// Пистолет: single hitscan
    pub fn pistol() -> Self {
        Self {
            fire_mode: FireMode::Single,
            end_of_fire_cooldown: 0.3,
            ..Self::default()
        }
    }

    /// Винтовка с отсечкой по 3
    pub fn burst_rifle() -> Self {
        Self {
            fire_mode: FireMode::DEFAULT_BURST,
            max_range: 80.0,
            end_of_fire_cooldown: 0.5,
            ..Self::default()
        }
    }

    /// Луч: continuous hitscan (выстрел каждый tick)
    pub fn beam() -> Self {
        Self {
            fire_mode: FireMode::Continuous { max_duration: 2.0 },
            max_range: 30.0,
            end_of_fire_cooldown: 1.0,
            accuracy: AccuracyConfig {
                max_horizontal_error: 0.25,
                max_vertical_error: 0.25,
            },
            ..Self::default()
        }
    }

    /// Ракетница: single projectile
    pub fn launcher() -> Self {
        Self {
            fire_mode: FireMode::Single,
            projectile_type: ProjectileType::Projectile,
            projectile_launch_speed: 20.0,
            projectile_kind: "rocket".to_string(),
            end_of_fire_cooldown: 1.5,
            ..Self::default()
        }
    }

    /// Проверка конфига (ошибки дизайна отклоняются, не клампятся)
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_range", self.max_range)?;
        non_negative("end_of_fire_cooldown", self.end_of_fire_cooldown)?;
        non_negative("projectile_launch_speed", self.projectile_launch_speed)?;
        angle_error("accuracy.max_horizontal_error", self.accuracy.max_horizontal_error)?;
        angle_error("accuracy.max_vertical_error", self.accuracy.max_vertical_error)?;

        match self.fire_mode {
            FireMode::Single => {}
            FireMode::Burst {
                size,
                interval,
                error_escalation_per_shot,
            } => {
                if size == 0 {
                    return Err(ConfigError::EmptyBurst);
                }
                non_negative("burst.interval", interval)?;
                if !error_escalation_per_shot.is_finite() {
                    return Err(ConfigError::NotFinite {
                        field: "burst.error_escalation_per_shot",
                        value: error_escalation_per_shot,
                    });
                }
                if error_escalation_per_shot < 1.0 {
                    return Err(ConfigError::EscalationBelowOne(error_escalation_per_shot));
                }
                self.check_burst_spread(size, error_escalation_per_shot)?;
            }
            FireMode::Continuous { max_duration } => {
                non_negative("continuous.max_duration", max_duration)?;
            }
        }

        if self.projectile_type == ProjectileType::Projectile && self.projectile_kind.is_empty() {
            return Err(ConfigError::MissingProjectileKind);
        }

        Ok(())
    }

    /// Разброс последнего выстрела очереди должен оставаться конечным
    ///
    /// Диапазон сэмплинга `[-limit, +limit]`, запас x4 покрывает ширину
    /// диапазона и накопленное округление escalation.
    fn check_burst_spread(&self, size: u32, per_shot: f32) -> Result<(), ConfigError> {
        let peak_escalation = per_shot.powf(size.saturating_sub(1) as f32);
        let widest = self
            .accuracy
            .max_horizontal_error
            .max(self.accuracy.max_vertical_error);

        if !peak_escalation.is_finite() || !(widest * peak_escalation * 4.0).is_finite() {
            return Err(ConfigError::EscalationOverflow { size, per_shot });
        }
        Ok(())
    }
}

/// Угол разброса: конечный, >= 0 и не больше полуоборота
fn angle_error(field: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value > MAX_ANGLE_ERROR {
        return Err(ConfigError::AngleTooLarge {
            field,
            value,
            max: MAX_ANGLE_ERROR,
        });
    }
    Ok(())
}
