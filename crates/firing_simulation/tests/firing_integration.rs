//! Firing integration test
//!
//! Bevy App с FiringPlugin, FixedUpdate гоняем вручную с фиксированным delta.
//!
//! Проверяем:
//! - Single / Burst / Continuous через FireIntent
//! - Hitscan попадания через HitScanBackend
//! - Spawn, движение, lifetime и impact снарядов
//! - Отказ collaborator'а не ломает таймеры

use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{RigidBody, Velocity};
use firing_simulation::combat::{
    ContinuousFireEffects, HitScanHit, ProjectileDespawned, ProjectileImpactReport,
    ProjectileImpacted, ProjectileLaunched, WeaponFired,
};
use firing_simulation::weapon::{RayHit, RayQuery, ShotOutcome};
use firing_simulation::*;

const DT: f32 = 0.25;

/// Helper: App без MinimalPlugins — время двигаем сами
fn firing_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins(FiringPlugin);

    let mut catalog = ProjectileCatalog::default();
    catalog.insert("rocket", ProjectileConfig::rocket()).unwrap();
    catalog.insert("slug", ProjectileConfig::slug()).unwrap();
    app.insert_resource(catalog);

    app
}

/// Helper: один fixed step
fn step(app: &mut App, delta: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(delta));
    app.world_mut().run_schedule(FixedUpdate);
}

/// Helper: забрать все накопленные события
fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn spawn_weapon(app: &mut App, config: WeaponConfig) -> Entity {
    app.world_mut()
        .spawn((Weapon::new(config).unwrap(), Transform::from_xyz(0.0, 1.0, 0.0)))
        .id()
}

fn status(app: &App, weapon: Entity) -> WeaponStatus {
    app.world().get::<Weapon>(weapon).unwrap().status()
}

fn live_projectiles(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .query_filtered::<Entity, With<LiveProjectile>>()
        .iter(app.world())
        .collect()
}

#[test]
fn test_single_shot_then_cooldown() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            end_of_fire_cooldown: 0.5,
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);

    assert_eq!(drain::<WeaponFired>(&mut app).len(), 1);
    // tick_weapons уже отработал 0.25 из 0.5
    assert_eq!(status(&app, weapon), WeaponStatus::CoolingDown);

    step(&mut app, DT);
    assert_eq!(status(&app, weapon), WeaponStatus::ReadyToFire);
    assert!(drain::<WeaponFired>(&mut app).is_empty());
}

#[test]
fn test_burst_three_shots_with_escalation() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            fire_mode: FireMode::Burst {
                size: 3,
                interval: 0.25,
                error_escalation_per_shot: 1.5,
            },
            end_of_fire_cooldown: 1.0,
            ..WeaponConfig::default()
        },
    );

    // Шаг 1: intent → выстрел 1, затем tick (0.25) → выстрел 2
    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    // Шаг 2: выстрел 3 → cooldown
    step(&mut app, DT);

    let escalations: Vec<f32> = drain::<WeaponFired>(&mut app)
        .iter()
        .map(|fired| fired.shot.error_escalation)
        .collect();
    assert_eq!(escalations, vec![1.0, 1.5, 2.25]);
    assert_eq!(status(&app, weapon), WeaponStatus::CoolingDown);

    let controller = &app.world().get::<Weapon>(weapon).unwrap().controller;
    assert_eq!(controller.error_escalation(), 1.0);
}

#[test]
fn test_continuous_hitscan_hits_every_tick() {
    let mut app = firing_app();
    let target = app.world_mut().spawn(Transform::default()).id();
    app.insert_resource(HitScanBackend::new(
        move |query: &RayQuery| -> Result<Option<RayHit>, CollaboratorError> {
            Ok(Some(RayHit {
                target,
                point: query.origin + query.direction * 5.0,
                distance: 5.0,
            }))
        },
    ));

    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            fire_mode: FireMode::Continuous { max_duration: 2.0 },
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    // Стартовый выстрел + выстрел тика
    assert_eq!(drain::<WeaponFired>(&mut app).len(), 2);

    for _ in 0..6 {
        step(&mut app, DT);
        assert_eq!(drain::<WeaponFired>(&mut app).len(), 1);
    }

    // 8 × 0.25 = 2.0 — время вышло
    step(&mut app, DT);
    assert!(drain::<WeaponFired>(&mut app).is_empty());
    assert_eq!(status(&app, weapon), WeaponStatus::CoolingDown);

    let hits = drain::<HitScanHit>(&mut app);
    assert_eq!(hits.len(), 8);
    assert!(hits.iter().all(|hit| hit.hit.target == target && hit.weapon == weapon));

    let effects: Vec<bool> = drain::<ContinuousFireEffects>(&mut app)
        .iter()
        .map(|e| e.active)
        .collect();
    assert_eq!(effects, vec![true, false]);
}

#[test]
fn test_ray_backend_failure_keeps_burst_going() {
    let mut app = firing_app();
    app.insert_resource(HitScanBackend::new(
        |_: &RayQuery| -> Result<Option<RayHit>, CollaboratorError> {
            Err(CollaboratorError::RayQueryFailed("no physics world".into()))
        },
    ));
    let weapon = spawn_weapon(&mut app, WeaponConfig::burst_rifle());

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    step(&mut app, DT);

    let fired = drain::<WeaponFired>(&mut app);
    assert_eq!(fired.len(), 3);
    assert!(fired.iter().all(|f| f.shot.outcome == ShotOutcome::Miss));
    assert_eq!(status(&app, weapon), WeaponStatus::CoolingDown);
}

#[test]
fn test_engine_projectile_gets_rigid_body_velocity() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            accuracy: AccuracyConfig::PERFECT,
            ..WeaponConfig::launcher()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);

    let launched = drain::<ProjectileLaunched>(&mut app);
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].kind, "rocket");

    let projectile = launched[0].projectile;
    let world = app.world();
    let velocity = world.get::<Velocity>(projectile).unwrap();
    assert!(velocity.linvel.abs_diff_eq(Vec3::new(0.0, 0.0, -20.0), 1e-5));
    assert_eq!(world.get::<RigidBody>(projectile), Some(&RigidBody::Dynamic));
    assert_eq!(world.get::<LiveProjectile>(projectile).unwrap().shooter, weapon);
    assert_eq!(world.get::<Transform>(projectile).unwrap().translation, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_custom_projectile_moves_and_expires() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            projectile_type: ProjectileType::Projectile,
            projectile_kind: "slug".into(),
            projectile_launch_speed: 4.0,
            accuracy: AccuracyConfig::PERFECT,
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    let projectile = drain::<ProjectileLaunched>(&mut app)[0].projectile;

    // Снаряд начинает тикать со следующего шага
    for n in 1..=4 {
        step(&mut app, DT);
        let translation = app.world().get::<Transform>(projectile).unwrap().translation;
        let expected = Vec3::new(0.0, 1.0, 0.0) + Vec3::NEG_Z * 4.0 * DT * n as f32;
        assert!(translation.abs_diff_eq(expected, 1e-5), "tick {}: {:?}", n, translation);
    }

    // slug живёт 5.0s = 20 тиков; 4 уже прошли
    for _ in 0..15 {
        step(&mut app, DT);
    }
    assert_eq!(live_projectiles(&mut app), vec![projectile]);
    assert!(drain::<ProjectileDespawned>(&mut app).is_empty());

    step(&mut app, DT);
    assert!(live_projectiles(&mut app).is_empty());

    let despawned = drain::<ProjectileDespawned>(&mut app);
    assert_eq!(despawned.len(), 1);
    assert_eq!(despawned[0].reason, DespawnReason::LifetimeExpired);
    assert_eq!(despawned[0].shooter, weapon);

    // Повторные тики ничего не делают
    step(&mut app, DT);
    assert!(drain::<ProjectileDespawned>(&mut app).is_empty());
}

/// Helper: tick последнего изменения Transform
fn transform_changed_tick(app: &App, entity: Entity) -> bevy::ecs::component::Tick {
    app.world()
        .entity(entity)
        .get_change_ticks::<Transform>()
        .unwrap()
        .changed
}

#[test]
fn test_only_custom_projectiles_touch_transform() {
    let mut app = firing_app();
    let launcher = spawn_weapon(&mut app, WeaponConfig::launcher());
    let slinger = spawn_weapon(
        &mut app,
        WeaponConfig {
            projectile_type: ProjectileType::Projectile,
            projectile_kind: "slug".into(),
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(launcher));
    app.world_mut().send_event(FireIntent::start(slinger));
    step(&mut app, DT);

    let launched = drain::<ProjectileLaunched>(&mut app);
    let rocket = launched.iter().find(|l| l.kind == "rocket").unwrap().projectile;
    let slug = launched.iter().find(|l| l.kind == "slug").unwrap().projectile;

    let rocket_before = transform_changed_tick(&app, rocket);
    let slug_before = transform_changed_tick(&app, slug);
    step(&mut app, DT);

    // Engine-снаряд двигает rapier, Transform не трогаем
    assert_eq!(transform_changed_tick(&app, rocket), rocket_before);
    assert_ne!(transform_changed_tick(&app, slug), slug_before);
    assert!(app.world().get::<LiveProjectile>(rocket).unwrap().projectile.is_active());
}

#[test]
fn test_projectile_impact_processed_once() {
    let mut app = firing_app();
    let weapon = spawn_weapon(&mut app, WeaponConfig::launcher());
    let wall = app.world_mut().spawn(Transform::default()).id();

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    let projectile = drain::<ProjectileLaunched>(&mut app)[0].projectile;

    let report = ProjectileImpactReport {
        projectile,
        target: wall,
        point: Vec3::new(0.0, 1.0, -3.0),
    };
    app.world_mut().send_event(report);
    app.world_mut().send_event(report);
    step(&mut app, DT);

    let impacted = drain::<ProjectileImpacted>(&mut app);
    assert_eq!(impacted.len(), 1);
    assert_eq!(impacted[0].target, wall);
    assert_eq!(impacted[0].shooter, weapon);

    let despawned = drain::<ProjectileDespawned>(&mut app);
    assert_eq!(despawned.len(), 1);
    assert_eq!(despawned[0].reason, DespawnReason::Impact);
    assert!(live_projectiles(&mut app).is_empty());
}

#[test]
fn test_projectile_outlives_weapon() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            projectile_type: ProjectileType::Projectile,
            projectile_kind: "slug".into(),
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);
    let projectile = drain::<ProjectileLaunched>(&mut app)[0].projectile;

    app.world_mut().despawn(weapon);
    step(&mut app, DT);

    let live = app.world().get::<LiveProjectile>(projectile).unwrap();
    assert!(live.projectile.is_active());
    assert_eq!(live.projectile.life_remaining(), Some(5.0 - DT));
}

#[test]
fn test_unknown_projectile_kind_aborts_shot() {
    let mut app = firing_app();
    let weapon = spawn_weapon(
        &mut app,
        WeaponConfig {
            projectile_type: ProjectileType::Projectile,
            projectile_kind: "plasma".into(),
            ..WeaponConfig::default()
        },
    );

    app.world_mut().send_event(FireIntent::start(weapon));
    step(&mut app, DT);

    let fired = drain::<WeaponFired>(&mut app);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].shot.outcome, ShotOutcome::Aborted);
    assert!(drain::<ProjectileLaunched>(&mut app).is_empty());
    assert!(live_projectiles(&mut app).is_empty());
}

#[test]
fn test_weapons_fire_independently() {
    let mut app = firing_app();
    let pistol = spawn_weapon(&mut app, WeaponConfig::pistol());
    let rifle = spawn_weapon(&mut app, WeaponConfig::burst_rifle());

    app.world_mut().send_event(FireIntent::start(pistol));
    app.world_mut().send_event(FireIntent::start(rifle));
    step(&mut app, DT);
    step(&mut app, DT);

    let fired = drain::<WeaponFired>(&mut app);
    assert_eq!(fired.iter().filter(|f| f.weapon == pistol).count(), 1);
    assert_eq!(fired.iter().filter(|f| f.weapon == rifle).count(), 3);
}
