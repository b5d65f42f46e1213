//! ECS-сторона collaborator'ов: raycast backend, каталог снарядов,
//! адаптер `WeaponWorld` поверх ресурсов.
//!
//! Spawn снарядов отложенный: адаптер собирает запущенные снаряды в
//! `FireReport`, система превращает их в entity через Commands.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::accuracy::MuzzlePose;
use crate::config::ArmoryConfig;
use crate::error::{CollaboratorError, ConfigError};
use crate::projectile::{Projectile, ProjectileBody, ProjectileConfig};
use crate::weapon::{ProjectileHandle, RayHit, RayQuery, ShotFired, WeaponWorld};

/// Провайдер hitscan raycast'ов (Rapier query pipeline или тестовый stub)
pub trait RayCaster: Send + Sync {
    fn cast_ray(&self, query: &RayQuery) -> Result<Option<RayHit>, CollaboratorError>;
}

impl<F> RayCaster for F
where
    F: Fn(&RayQuery) -> Result<Option<RayHit>, CollaboratorError> + Send + Sync,
{
    fn cast_ray(&self, query: &RayQuery) -> Result<Option<RayHit>, CollaboratorError> {
        self(query)
    }
}

/// Backend по умолчанию: ни во что не попадает
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHits;

impl RayCaster for NoHits {
    fn cast_ray(&self, _query: &RayQuery) -> Result<Option<RayHit>, CollaboratorError> {
        Ok(None)
    }
}

/// Resource: текущий raycast backend (ставит host)
#[derive(Resource)]
pub struct HitScanBackend(Box<dyn RayCaster>);

impl Default for HitScanBackend {
    fn default() -> Self {
        Self::new(NoHits)
    }
}

impl HitScanBackend {
    pub fn new(caster: impl RayCaster + 'static) -> Self {
        Self(Box::new(caster))
    }

    pub fn caster(&self) -> &dyn RayCaster {
        self.0.as_ref()
    }
}

/// Resource: projectile kind → ProjectileConfig
#[derive(Resource, Debug, Clone, Default)]
pub struct ProjectileCatalog {
    entries: HashMap<String, ProjectileConfig>,
}

impl ProjectileCatalog {
    /// Снаряды из арсенала (уже провалидированного)
    pub fn from_armory(armory: &ArmoryConfig) -> Self {
        Self {
            entries: armory.projectiles.clone(),
        }
    }

    pub fn insert(&mut self, kind: impl Into<String>, config: ProjectileConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.entries.insert(kind.into(), config);
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Option<&ProjectileConfig> {
        self.entries.get(kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Снаряд, запущенный за этот вызов (ещё не entity)
#[derive(Debug, Clone)]
pub struct PendingProjectile {
    pub projectile: Projectile,
    pub pose: MuzzlePose,
    pub kind: String,
    /// Velocity change от launch (Engine mode)
    pub velocity: Vec3,
}

/// Всё, что оружие сделало за один request/tick
#[derive(Debug, Default)]
pub struct FireReport {
    pub shots: Vec<ShotFired>,
    pub hits: Vec<RayHit>,
    pub launched: Vec<PendingProjectile>,
    pub effects: Vec<bool>,
}

/// Тело снаряда в момент launch: запоминает velocity change
#[derive(Debug, Default)]
struct LaunchBody {
    velocity: Vec3,
}

impl ProjectileBody for LaunchBody {
    fn apply_velocity_change(&mut self, delta: Vec3) {
        self.velocity += delta;
    }

    fn set_position(&mut self, _position: Vec3) {}
}

/// Handle: launch переносит снаряд в отчёт, у оружия ничего не остаётся
struct PendingLaunch<'a> {
    projectile: Projectile,
    pose: MuzzlePose,
    kind: String,
    launched: &'a mut Vec<PendingProjectile>,
}

impl ProjectileHandle for PendingLaunch<'_> {
    fn launch(self: Box<Self>, direction: Vec3, speed: f32) {
        let PendingLaunch {
            mut projectile,
            pose,
            kind,
            launched,
        } = *self;

        let mut body = LaunchBody::default();
        projectile.launch(direction, speed, &mut body);

        launched.push(PendingProjectile {
            projectile,
            pose,
            kind,
            velocity: body.velocity,
        });
    }
}

/// `WeaponWorld` поверх ECS ресурсов для одного оружия
pub struct EcsWeaponWorld<'a> {
    muzzle: MuzzlePose,
    ray_caster: &'a dyn RayCaster,
    catalog: &'a ProjectileCatalog,
    report: &'a mut FireReport,
}

impl<'a> EcsWeaponWorld<'a> {
    pub fn new(
        muzzle: MuzzlePose,
        ray_caster: &'a dyn RayCaster,
        catalog: &'a ProjectileCatalog,
        report: &'a mut FireReport,
    ) -> Self {
        Self {
            muzzle,
            ray_caster,
            catalog,
            report,
        }
    }
}

impl WeaponWorld for EcsWeaponWorld<'_> {
    fn muzzle_pose(&self) -> MuzzlePose {
        self.muzzle
    }

    fn cast_ray(&mut self, query: &RayQuery) -> Result<Option<RayHit>, CollaboratorError> {
        self.ray_caster.cast_ray(query)
    }

    fn spawn_projectile(
        &mut self,
        pose: MuzzlePose,
        kind: &str,
    ) -> Result<Box<dyn ProjectileHandle + '_>, CollaboratorError> {
        let config = self
            .catalog
            .get(kind)
            .copied()
            .ok_or_else(|| CollaboratorError::UnknownProjectileKind(kind.to_string()))?;

        let projectile = Projectile::new(config, pose.position)
            .map_err(|error| CollaboratorError::SpawnFailed(error.to_string()))?;

        Ok(Box::new(PendingLaunch {
            projectile,
            pose,
            kind: kind.to_string(),
            launched: &mut self.report.launched,
        }))
    }

    fn on_shot(&mut self, shot: &ShotFired) {
        self.report.shots.push(*shot);
    }

    fn on_hit(&mut self, hit: &RayHit) {
        crate::logger::log(&format!(
            "HitScan hit: {:?} at {:?} ({:.2}m)",
            hit.target, hit.point, hit.distance
        ));
        self.report.hits.push(*hit);
    }

    fn on_continuous_effects(&mut self, active: bool) {
        self.report.effects.push(active);
    }
}
