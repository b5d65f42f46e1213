//! Внешние collaborator'ы оружия (физика, spawner, observability)
//!
//! Ядро не знает про физический движок: всё, что нужно
//! для одного выстрела, идёт через `WeaponWorld`.

use bevy::prelude::*;

use crate::accuracy::{AngularError, MuzzlePose};
use crate::error::CollaboratorError;
use crate::weapon::config::HitFilter;

/// Запрос nearest-hit raycast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Unit vector
    pub direction: Vec3,
    pub max_distance: f32,
    pub filter: HitFilter,
}

/// Результат raycast'а
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RayHit {
    /// Во что попали
    pub target: Entity,
    /// Точка попадания (world space)
    pub point: Vec3,
    /// Дистанция от origin
    pub distance: f32,
}

/// Чем закончился выстрел
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Hitscan попал
    Hit(RayHit),
    /// Hitscan промахнулся (или raycast отказал)
    Miss,
    /// Снаряд заспавнен и передан дальше
    ProjectileLaunched,
    /// Spawn не удался — выстрел потерян
    Aborted,
}

/// Один выстрел (для observability и тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotFired {
    pub origin: Vec3,
    pub direction: Vec3,
    pub error: AngularError,
    pub error_escalation: f32,
    pub outcome: ShotOutcome,
}

/// Handle только что заспавненного снаряда
///
/// `launch` потребляет handle: после запуска у оружия не остаётся ссылки
/// на снаряд, им владеет тот, кто его заспавнил.
pub trait ProjectileHandle {
    fn launch(self: Box<Self>, direction: Vec3, speed: f32);
}

/// Всё, что оружию нужно от окружения
pub trait WeaponWorld {
    /// Откуда стреляем
    fn muzzle_pose(&self) -> MuzzlePose;

    /// Синхронный nearest-hit raycast
    fn cast_ray(&mut self, query: &RayQuery) -> Result<Option<RayHit>, CollaboratorError>;

    /// Синхронный spawn снаряда в muzzle pose
    fn spawn_projectile(
        &mut self,
        pose: MuzzlePose,
        kind: &str,
    ) -> Result<Box<dyn ProjectileHandle + '_>, CollaboratorError>;

    /// Каждый выстрел (после доставки)
    fn on_shot(&mut self, _shot: &ShotFired) {}

    /// Hitscan попал
    fn on_hit(&mut self, hit: &RayHit) {
        crate::logger::log(&format!(
            "HitScan hit: {:?} at {:?} ({:.2}m)",
            hit.target, hit.point, hit.distance
        ));
    }

    /// Continuous эффекты (старт = true, стоп = false)
    fn on_continuous_effects(&mut self, _active: bool) {}

    /// Collaborator отказал — выстрел деградирует, таймеры не трогаются
    fn on_collaborator_failure(&mut self, error: &CollaboratorError) {
        crate::logger::log_warning(&format!("Weapon collaborator failure: {}", error));
    }
}
