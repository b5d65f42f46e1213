//! Accuracy helpers — разброс выстрела (spread) и muzzle pose
//!
//! Ошибка прицеливания сэмплируется независимо по двум осям:
//! - yaw (горизонталь): `[-max_h * escalation, +max_h * escalation]`
//! - pitch (вертикаль): `[-max_v * escalation, +max_v * escalation]`
//!
//! Вращение применяется в world space к forward muzzle: yaw вокруг мировой Y,
//! pitch вокруг мировой X. Для наклонённого ствола это не то же самое, что
//! поворот в локальных осях.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Позиция и ориентация, из которой вылетает выстрел
///
/// Forward = -Z (Bevy convention, совпадает с `Transform::forward`).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MuzzlePose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for MuzzlePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl MuzzlePose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Muzzle pose из Transform оружия
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: transform.rotation,
        }
    }

    /// Направление ствола (unit vector)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Верхняя граница `max_*_error` (градусы): больше полуоборота разброс не имеет смысла
pub const MAX_ANGLE_ERROR: f32 = 180.0;

/// Максимальная ошибка прицеливания (градусы)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyConfig {
    /// Горизонтальная ошибка (yaw), градусы
    pub max_horizontal_error: f32,
    /// Вертикальная ошибка (pitch), градусы
    pub max_vertical_error: f32,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self {
            max_horizontal_error: 1.0,
            max_vertical_error: 1.0,
        }
    }
}

impl AccuracyConfig {
    /// Идеальная точность (без разброса)
    pub const PERFECT: Self = Self {
        max_horizontal_error: 0.0,
        max_vertical_error: 0.0,
    };
}

/// Сэмплированная ошибка одного выстрела (градусы)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct AngularError {
    /// Горизонтальная ошибка (вокруг world Y)
    pub yaw: f32,
    /// Вертикальная ошибка (вокруг world X)
    pub pitch: f32,
}

impl AngularError {
    pub const ZERO: Self = Self { yaw: 0.0, pitch: 0.0 };

    /// Кватернион ошибки (world space): Y * X, как Euler(pitch, yaw, 0)
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }
}

/// Сэмплирует ошибку для одного выстрела
///
/// `escalation` >= 1.0 масштабирует оба диапазона (recoil buildup в burst).
pub fn sample_angular_error<R: Rng + ?Sized>(
    rng: &mut R,
    accuracy: &AccuracyConfig,
    escalation: f32,
) -> AngularError {
    AngularError {
        yaw: sample_symmetric(rng, accuracy.max_horizontal_error * escalation),
        pitch: sample_symmetric(rng, accuracy.max_vertical_error * escalation),
    }
}

/// Uniform в `[-limit, +limit]`
fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, limit: f32) -> f32 {
    if limit <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-limit..=limit)
}

/// Направление выстрела: forward muzzle, повёрнутый на ошибку в world space
pub fn apply_angular_error(muzzle: &MuzzlePose, error: &AngularError) -> Vec3 {
    (error.rotation() * muzzle.forward()).normalize()
}
