//! Headless симуляция стрельбы
//!
//! Запускает Bevy App без рендера: демо-арсенал (или RON из argv[1]),
//! каждое оружие зажимает спуск на старте, 600 тиков, затем сводка.

use std::collections::HashMap;

use bevy::prelude::*;
use firing_simulation::combat::{HitScanHit, ProjectileDespawned, ProjectileLaunched, WeaponFired};
use firing_simulation::weapon::{RayHit, RayQuery};
use firing_simulation::{
    create_headless_app, log_error, ArmoryConfig, CollaboratorError, FireIntent, HitScanBackend,
    SimulationConfig, Weapon,
};

const TICKS: usize = 600;

fn main() {
    let armory = match std::env::args().nth(1) {
        Some(path) => match ArmoryConfig::load(&path) {
            Ok(armory) => armory,
            Err(error) => {
                log_error(&format!("Failed to load armory '{}': {}", path, error));
                std::process::exit(1);
            }
        },
        None => ArmoryConfig::demo(),
    };

    let config = SimulationConfig::default();
    println!(
        "Starting firing simulation (seed: {}, {} weapons)",
        config.seed,
        armory.weapons.len()
    );

    let mut app = create_headless_app(config, &armory);
    app.add_systems(Update, collect_stats)
        .init_resource::<Stats>();

    // Демо-физика: только плоскость земли y = 0
    let ground = app.world_mut().spawn(Transform::default()).id();
    app.insert_resource(HitScanBackend::new(
        move |query: &RayQuery| -> Result<Option<RayHit>, CollaboratorError> {
            Ok(ground_hit(ground, query))
        },
    ));

    // Детерминированный порядок spawn
    let mut names: Vec<_> = armory.weapons.keys().cloned().collect();
    names.sort();

    let mut weapons = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let weapon = match Weapon::new(armory.weapons[name].clone()) {
            Ok(weapon) => weapon,
            Err(error) => {
                log_error(&format!("Weapon '{}' rejected: {}", name, error));
                continue;
            }
        };

        // Чуть вниз, чтобы лучи доставали до земли
        let transform = Transform::from_xyz(index as f32 * 2.0, 1.5, 0.0)
            .looking_to(Vec3::new(0.0, -0.1, -1.0), Vec3::Y);
        let entity = app.world_mut().spawn((weapon, transform)).id();
        weapons.push((name.clone(), entity));
    }

    for (_, entity) in &weapons {
        app.world_mut().send_event(FireIntent::start(*entity));
    }

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            let projectiles = app
                .world_mut()
                .query::<&firing_simulation::LiveProjectile>()
                .iter(app.world())
                .count();
            println!("Tick {}: {} live projectiles", tick, projectiles);
        }
    }

    let stats = app.world().resource::<Stats>();
    for (name, entity) in &weapons {
        println!(
            "{:>12}: {} shots, {} hits, {} projectiles launched",
            name,
            stats.shots.get(entity).copied().unwrap_or(0),
            stats.hits.get(entity).copied().unwrap_or(0),
            stats.launched.get(entity).copied().unwrap_or(0),
        );
    }
    println!("Projectiles despawned: {}", stats.despawned);
    println!("Simulation complete!");
}

/// Пересечение луча с плоскостью y = 0
fn ground_hit(ground: Entity, query: &RayQuery) -> Option<RayHit> {
    if query.direction.y >= 0.0 {
        return None;
    }

    let distance = -query.origin.y / query.direction.y;
    if distance > query.max_distance {
        return None;
    }

    Some(RayHit {
        target: ground,
        point: query.origin + query.direction * distance,
        distance,
    })
}

#[derive(Resource, Default)]
struct Stats {
    shots: HashMap<Entity, usize>,
    hits: HashMap<Entity, usize>,
    launched: HashMap<Entity, usize>,
    despawned: usize,
}

fn collect_stats(
    mut stats: ResMut<Stats>,
    mut fired: EventReader<WeaponFired>,
    mut hits: EventReader<HitScanHit>,
    mut launched: EventReader<ProjectileLaunched>,
    mut despawned: EventReader<ProjectileDespawned>,
) {
    for event in fired.read() {
        *stats.shots.entry(event.weapon).or_default() += 1;
    }
    for event in hits.read() {
        *stats.hits.entry(event.weapon).or_default() += 1;
    }
    for event in launched.read() {
        *stats.launched.entry(event.weapon).or_default() += 1;
    }
    stats.despawned += despawned.read().count();
}
