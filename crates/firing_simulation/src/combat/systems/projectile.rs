//! Projectile systems: lifetime/движение + обработка столкновений
//!
//! Снаряд удаляется ровно один раз: либо по lifetime, либо по первому impact.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use crate::combat::{LiveProjectile, ProjectileDespawned, ProjectileImpactReport, ProjectileImpacted};
use crate::projectile::{DespawnReason, ImpactEvent, LoggingObserver, ProjectileBody, ProjectileTick};

/// Тело снаряда = его Transform (+ rapier Velocity в Engine mode)
///
/// `Mut` разыменовывается только при записи: Engine-снаряды не помечают
/// Transform как changed.
struct EntityBody<'a> {
    transform: Mut<'a, Transform>,
    velocity: Option<Mut<'a, Velocity>>,
}

impl ProjectileBody for EntityBody<'_> {
    fn apply_velocity_change(&mut self, delta: Vec3) {
        match self.velocity.as_mut() {
            Some(velocity) => velocity.linvel += delta,
            None => crate::logger::log_warning("Projectile velocity change without rapier Velocity"),
        }
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }
}

/// System: tick lifetime + Custom движение
pub fn tick_projectiles(
    time: Res<Time>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut LiveProjectile, &mut Transform, Option<&mut Velocity>)>,
    mut despawned: EventWriter<ProjectileDespawned>,
) {
    let delta = time.delta_secs();

    for (entity, mut live, transform, velocity) in projectiles.iter_mut() {
        let mut body = EntityBody { transform, velocity };

        if live.projectile.tick(delta, &mut body, &mut LoggingObserver) == ProjectileTick::Expired {
            despawned.write(ProjectileDespawned {
                projectile: entity,
                shooter: live.shooter,
                reason: DespawnReason::LifetimeExpired,
            });
            commands.entity(entity).despawn();
        }
    }
}

/// System: ProjectileImpactReport → on_impact → despawn
///
/// Повторные/поздние отчёты для того же снаряда игнорируются.
pub fn process_projectile_impacts(
    mut reports: EventReader<ProjectileImpactReport>,
    mut commands: Commands,
    mut projectiles: Query<&mut LiveProjectile>,
    mut impacted: EventWriter<ProjectileImpacted>,
    mut despawned: EventWriter<ProjectileDespawned>,
) {
    for report in reports.read() {
        let Ok(mut live) = projectiles.get_mut(report.projectile) else {
            continue;
        };

        let impact = ImpactEvent {
            target: report.target,
            point: report.point,
        };

        if !live.projectile.on_impact(&impact, &mut LoggingObserver) {
            continue;
        }

        impacted.write(ProjectileImpacted {
            projectile: report.projectile,
            shooter: live.shooter,
            target: report.target,
            point: report.point,
        });
        despawned.write(ProjectileDespawned {
            projectile: report.projectile,
            shooter: live.shooter,
            reason: DespawnReason::Impact,
        });
        commands.entity(report.projectile).despawn();
    }
}
