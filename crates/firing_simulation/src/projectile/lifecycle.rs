//! Projectile lifecycle — Inactive → Active → Destroyed
//!
//! Снаряд владеет своим состоянием целиком: оружие после launch его не трогает.
//! Destroyed — терминальное состояние, дальнейшие tick/impact игнорируются
//! (идемпотентный no-op, возвращают "ничего не произошло").

use bevy::prelude::*;

use crate::error::ConfigError;

use super::config::{ProjectileConfig, ProjectilePhysics};

/// Почему снаряд исчез
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DespawnReason {
    /// Истекло время жизни
    LifetimeExpired,
    /// Первое столкновение
    Impact,
}

/// Столкновение снаряда (от внешней физики)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ImpactEvent {
    /// Во что врезались
    pub target: Entity,
    /// Точка контакта (world space)
    pub point: Vec3,
}

/// Фаза жизни снаряда
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub enum ProjectilePhase {
    /// Заспавнен, но ещё не запущен
    #[default]
    Inactive,

    Active {
        /// Unit vector (не ренормализуется)
        direction: Vec3,
        speed: f32,
        /// Секунд до despawn
        life_remaining: f32,
    },

    Destroyed(DespawnReason),
}

/// Результат одного tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileTick {
    /// Не запущен или уже уничтожен — ничего не делали
    Idle,
    /// Летит дальше
    Flying,
    /// Время жизни вышло на этом tick
    Expired,
}

/// Физическое тело снаряда (rigid body provider)
pub trait ProjectileBody {
    /// Мгновенное изменение скорости (только Engine mode)
    fn apply_velocity_change(&mut self, delta: Vec3);

    /// Переопределение позиции (только Custom mode)
    fn set_position(&mut self, position: Vec3);
}

/// Observability hooks; никогда не влияют на состояние снаряда
pub trait ProjectileObserver {
    fn notify_impact(&mut self, impact: &ImpactEvent) {
        crate::logger::log(&format!(
            "Projectile hit: {:?} at {:?}",
            impact.target, impact.point
        ));
    }

    fn notify_despawn(&mut self, reason: DespawnReason) {
        crate::logger::log(&format!("Projectile despawned: {:?}", reason));
    }
}

/// Observer, который только логирует
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl ProjectileObserver for LoggingObserver {}

/// Снаряд: конфиг + фаза + позиция (Custom mode)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Projectile {
    config: ProjectileConfig,
    phase: ProjectilePhase,
    position: Vec3,
}

impl Projectile {
    /// Новый снаряд в точке spawn (Inactive)
    pub fn new(config: ProjectileConfig, position: Vec3) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: ProjectilePhase::Inactive,
            position,
        })
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn phase(&self) -> &ProjectilePhase {
        &self.phase
    }

    /// Позиция, которую ведёт сам снаряд (Custom mode)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Active { .. })
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Destroyed(_))
    }

    pub fn life_remaining(&self) -> Option<f32> {
        match self.phase {
            ProjectilePhase::Active { life_remaining, .. } => Some(life_remaining),
            _ => None,
        }
    }

    pub fn despawn_reason(&self) -> Option<DespawnReason> {
        match self.phase {
            ProjectilePhase::Destroyed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Запуск: Inactive → Active
    ///
    /// `false`, если снаряд уже запускали (повторный launch игнорируется).
    pub fn launch<B>(&mut self, direction: Vec3, speed: f32, body: &mut B) -> bool
    where
        B: ProjectileBody + ?Sized,
    {
        if self.phase != ProjectilePhase::Inactive {
            return false;
        }

        self.phase = ProjectilePhase::Active {
            direction,
            speed,
            life_remaining: self.config.max_lifetime,
        };

        if self.config.physics == ProjectilePhysics::Engine {
            body.apply_velocity_change(direction * speed);
        }

        true
    }

    /// Tick: lifetime, затем (Custom) движение
    ///
    /// На tick истечения снаряд не двигается.
    pub fn tick<B, O>(&mut self, delta: f32, body: &mut B, observer: &mut O) -> ProjectileTick
    where
        B: ProjectileBody + ?Sized,
        O: ProjectileObserver + ?Sized,
    {
        let ProjectilePhase::Active {
            direction,
            speed,
            life_remaining,
        } = &mut self.phase
        else {
            return ProjectileTick::Idle;
        };

        *life_remaining -= delta;
        if *life_remaining <= 0.0 {
            self.phase = ProjectilePhase::Destroyed(DespawnReason::LifetimeExpired);
            observer.notify_despawn(DespawnReason::LifetimeExpired);
            return ProjectileTick::Expired;
        }

        if self.config.physics == ProjectilePhysics::Custom {
            // Explicit Euler: прямолинейно, без гравитации и сопротивления
            self.position += *direction * *speed * delta;
            body.set_position(self.position);
        }

        ProjectileTick::Flying
    }

    /// Столкновение: Active → Destroyed
    ///
    /// Обрабатывается ровно одно столкновение; остальные (и до launch) — `false`.
    pub fn on_impact<O>(&mut self, impact: &ImpactEvent, observer: &mut O) -> bool
    where
        O: ProjectileObserver + ?Sized,
    {
        if !self.is_active() {
            return false;
        }

        self.phase = ProjectilePhase::Destroyed(DespawnReason::Impact);
        observer.notify_impact(impact);
        observer.notify_despawn(DespawnReason::Impact);
        true
    }
}
