//! WeaponController — FSM стрельбы
//!
//! ```text
//! ReadyToFire ──start──▶ Firing ──stop / exhausted──▶ CoolingDown ──timer──▶ ReadyToFire
//!                  │                                      ▲
//!                  └── Single / Burst(1): сразу ──────────┘
//! ```
//!
//! Один tick = один вызов `tick(delta)` от драйвера (FixedUpdate).
//! Request handlers синхронны и возвращают `bool` (легален ли переход).

use rand::Rng;

use crate::accuracy::{apply_angular_error, sample_angular_error};
use crate::error::ConfigError;

use super::collaborators::{RayQuery, ShotFired, ShotOutcome, WeaponWorld};
use super::config::{FireMode, ProjectileType, WeaponConfig};
use super::state::{FiringPhase, PhaseStep, WeaponState, WeaponStatus};

/// Контроллер одного оружия: конфиг + runtime state
#[derive(Debug, Clone)]
pub struct WeaponController {
    config: WeaponConfig,
    state: WeaponState,
}

impl WeaponController {
    /// Создать контроллер (невалидный конфиг отклоняется)
    pub fn new(config: WeaponConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: WeaponState::ReadyToFire,
        })
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn state(&self) -> &WeaponState {
        &self.state
    }

    pub fn status(&self) -> WeaponStatus {
        self.state.status()
    }

    /// Текущий множитель разброса (1.0 вне burst)
    pub fn error_escalation(&self) -> f32 {
        match &self.state {
            WeaponState::Firing(phase) => phase.error_escalation(),
            _ => 1.0,
        }
    }

    /// Остаток cooldown (только в CoolingDown)
    pub fn cooldown_remaining(&self) -> Option<f32> {
        match self.state {
            WeaponState::CoolingDown { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Может ли оружие начать стрельбу прямо сейчас
    pub fn can_fire(&self) -> bool {
        self.state == WeaponState::ReadyToFire
    }

    /// ReadyToFire → Firing
    ///
    /// `false` (без побочных эффектов), если оружие не в ReadyToFire.
    /// Single и Burst(1) стреляют и уходят в CoolingDown в этом же вызове.
    pub fn request_start_firing<R, W>(&mut self, rng: &mut R, world: &mut W) -> bool
    where
        R: Rng + ?Sized,
        W: WeaponWorld + ?Sized,
    {
        if !self.can_fire() {
            return false;
        }

        match self.config.fire_mode {
            FireMode::Single => {
                self.fire_shot(1.0, rng, world);
                self.enter_cooldown();
            }
            FireMode::Burst {
                size,
                interval,
                error_escalation_per_shot,
            } => {
                self.fire_shot(1.0, rng, world);
                self.state = match FiringPhase::burst_after_first_shot(
                    size,
                    interval,
                    error_escalation_per_shot,
                ) {
                    Some(phase) => WeaponState::Firing(phase),
                    None => self.cooldown_state(),
                };
            }
            FireMode::Continuous { max_duration } => {
                self.state = WeaponState::Firing(FiringPhase::continuous(max_duration));
                self.start_continuous_effects(rng, world);
            }
        }

        true
    }

    /// Firing → CoolingDown
    ///
    /// В CoolingDown — `true` без изменений (уже останавливаемся),
    /// в ReadyToFire — `false`.
    pub fn request_stop_firing<W>(&mut self, world: &mut W) -> bool
    where
        W: WeaponWorld + ?Sized,
    {
        match self.state {
            WeaponState::Firing(phase) => {
                if matches!(phase, FiringPhase::Continuous { .. }) {
                    world.on_continuous_effects(false);
                }
                self.enter_cooldown();
                true
            }
            WeaponState::CoolingDown { .. } => true,
            WeaponState::ReadyToFire => false,
        }
    }

    /// Продвинуть FSM на `delta` секунд
    pub fn tick<R, W>(&mut self, delta: f32, rng: &mut R, world: &mut W)
    where
        R: Rng + ?Sized,
        W: WeaponWorld + ?Sized,
    {
        match &mut self.state {
            WeaponState::ReadyToFire => {}

            WeaponState::Firing(phase) => {
                match phase.advance(delta, self.config.projectile_type) {
                    PhaseStep::Hold => {}
                    PhaseStep::Fire { error_escalation } => {
                        self.fire_shot(error_escalation, rng, world);
                    }
                    PhaseStep::FireAndStop { error_escalation } => {
                        self.fire_shot(error_escalation, rng, world);
                        self.enter_cooldown();
                    }
                    PhaseStep::Exhausted => {
                        world.on_continuous_effects(false);
                        self.enter_cooldown();
                    }
                }
            }

            WeaponState::CoolingDown { remaining } => {
                *remaining -= delta;
                if *remaining <= 0.0 {
                    self.state = WeaponState::ReadyToFire;
                }
            }
        }
    }

    fn cooldown_state(&self) -> WeaponState {
        WeaponState::CoolingDown {
            remaining: self.config.end_of_fire_cooldown,
        }
    }

    /// Сброс фазы (burst/continuous таймеры и escalation уходят вместе с ней)
    fn enter_cooldown(&mut self) {
        self.state = self.cooldown_state();
    }

    fn start_continuous_effects<R, W>(&self, rng: &mut R, world: &mut W)
    where
        R: Rng + ?Sized,
        W: WeaponWorld + ?Sized,
    {
        world.on_continuous_effects(true);

        // Начальный выстрел луча; continuous projectile не стреляет
        if self.config.projectile_type == ProjectileType::HitScan {
            self.fire_shot(1.0, rng, world);
        }
    }

    /// Один выстрел: разброс → направление → hitscan или spawn
    ///
    /// Отказ collaborator'а понижается до промаха / потерянного снаряда.
    fn fire_shot<R, W>(&self, error_escalation: f32, rng: &mut R, world: &mut W)
    where
        R: Rng + ?Sized,
        W: WeaponWorld + ?Sized,
    {
        let muzzle = world.muzzle_pose();
        let error = sample_angular_error(rng, &self.config.accuracy, error_escalation);
        let direction = apply_angular_error(&muzzle, &error);

        let outcome = match self.config.projectile_type {
            ProjectileType::HitScan => {
                let query = RayQuery {
                    origin: muzzle.position,
                    direction,
                    max_distance: self.config.max_range,
                    filter: self.config.hit_filter,
                };

                match world.cast_ray(&query) {
                    Ok(Some(hit)) => {
                        world.on_hit(&hit);
                        ShotOutcome::Hit(hit)
                    }
                    Ok(None) => ShotOutcome::Miss,
                    Err(error) => {
                        world.on_collaborator_failure(&error);
                        ShotOutcome::Miss
                    }
                }
            }

            ProjectileType::Projectile => {
                // Handle держит world занятым: launch внутри, отказ репортим после
                let spawned = match world.spawn_projectile(muzzle, &self.config.projectile_kind) {
                    Ok(handle) => {
                        handle.launch(direction, self.config.projectile_launch_speed);
                        Ok(())
                    }
                    Err(error) => Err(error),
                };

                match spawned {
                    Ok(()) => ShotOutcome::ProjectileLaunched,
                    Err(error) => {
                        world.on_collaborator_failure(&error);
                        ShotOutcome::Aborted
                    }
                }
            }
        };

        world.on_shot(&ShotFired {
            origin: muzzle.position,
            direction,
            error,
            error_escalation,
            outcome,
        });
    }
}
