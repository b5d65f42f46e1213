//! Weapon systems: fire intents + FSM tick

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{RigidBody, Velocity};

use crate::accuracy::MuzzlePose;
use crate::combat::backend::{EcsWeaponWorld, FireReport, HitScanBackend, ProjectileCatalog};
use crate::combat::{
    ContinuousFireEffects, FireAction, FireIntent, FireRequestRejected, HitScanHit,
    LiveProjectile, ProjectileLaunched, Weapon, WeaponFired,
};
use crate::projectile::ProjectilePhysics;
use crate::weapon::WeaponStatus;
use crate::DeterministicRng;

/// Куда уходит результат выстрелов: события + spawn снарядов
#[derive(SystemParam)]
pub struct FireOutput<'w, 's> {
    commands: Commands<'w, 's>,
    fired: EventWriter<'w, WeaponFired>,
    hits: EventWriter<'w, HitScanHit>,
    launched: EventWriter<'w, ProjectileLaunched>,
    effects: EventWriter<'w, ContinuousFireEffects>,
}

impl FireOutput<'_, '_> {
    /// Отчёт одного оружия → события и entity снарядов
    fn flush(&mut self, weapon: Entity, report: FireReport) {
        for active in report.effects {
            self.effects.write(ContinuousFireEffects { weapon, active });
        }

        for hit in report.hits {
            self.hits.write(HitScanHit { weapon, hit });
        }

        for pending in report.launched {
            let physics = pending.projectile.config().physics;
            let transform =
                Transform::from_translation(pending.pose.position).with_rotation(pending.pose.rotation);

            let mut entity = self.commands.spawn((
                transform,
                LiveProjectile {
                    projectile: pending.projectile,
                    shooter: weapon,
                    kind: pending.kind.clone(),
                },
            ));

            // Engine: rigid body с начальной скоростью; Custom: кинематика, Transform пишем сами
            match physics {
                ProjectilePhysics::Engine => {
                    entity.insert((RigidBody::Dynamic, Velocity::linear(pending.velocity)));
                }
                ProjectilePhysics::Custom => {
                    entity.insert(RigidBody::KinematicPositionBased);
                }
            }

            let projectile = entity.id();
            crate::logger::log(&format!(
                "Weapon {:?} launched '{}' projectile {:?}",
                weapon, pending.kind, projectile
            ));
            self.launched.write(ProjectileLaunched {
                weapon,
                projectile,
                kind: pending.kind,
            });
        }

        for shot in report.shots {
            self.fired.write(WeaponFired { weapon, shot });
        }
    }
}

/// System: FireIntent → request_start_firing / request_stop_firing
///
/// Невалидный переход не ошибка: пишем FireRequestRejected и идём дальше.
pub fn process_fire_intents(
    mut intents: EventReader<FireIntent>,
    mut weapons: Query<(&mut Weapon, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    backend: Res<HitScanBackend>,
    catalog: Res<ProjectileCatalog>,
    mut rejected: EventWriter<FireRequestRejected>,
    mut output: FireOutput,
) {
    for intent in intents.read() {
        let Ok((mut weapon, transform)) = weapons.get_mut(intent.weapon) else {
            crate::logger::log_warning(&format!(
                "FireIntent for {:?}: entity has no Weapon",
                intent.weapon
            ));
            continue;
        };

        let status = weapon.status();
        let mut report = FireReport::default();
        let mut world = EcsWeaponWorld::new(
            MuzzlePose::from_transform(transform),
            backend.caster(),
            &catalog,
            &mut report,
        );

        let accepted = match intent.action {
            FireAction::Start => weapon
                .controller
                .request_start_firing(&mut rng.rng, &mut world),
            FireAction::Stop => weapon.controller.request_stop_firing(&mut world),
        };

        if !accepted {
            rejected.write(FireRequestRejected {
                weapon: intent.weapon,
                action: intent.action,
                status,
            });
            continue;
        }

        crate::logger::log(&format!(
            "Weapon {:?}: {:?} accepted ({:?} → {:?})",
            intent.weapon,
            intent.action,
            status,
            weapon.status()
        ));

        output.flush(intent.weapon, report);
    }
}

/// System: tick FSM всех стреляющих / остывающих оружий
pub fn tick_weapons(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    backend: Res<HitScanBackend>,
    catalog: Res<ProjectileCatalog>,
    mut output: FireOutput,
) {
    let delta = time.delta_secs();

    for (entity, mut weapon, transform) in weapons.iter_mut() {
        // ReadyToFire — per-tick работы нет
        if weapon.status() == WeaponStatus::ReadyToFire {
            continue;
        }

        let mut report = FireReport::default();
        let mut world = EcsWeaponWorld::new(
            MuzzlePose::from_transform(transform),
            backend.caster(),
            &catalog,
            &mut report,
        );

        weapon.controller.tick(delta, &mut rng.rng, &mut world);

        output.flush(entity, report);
    }
}
