//! WeaponState — runtime FSM оружия (tagged union)
//!
//! Каждое состояние несёт только свои таймеры:
//! - `ReadyToFire` — ничего
//! - `Firing(FiringPhase)` — таймеры burst ИЛИ continuous (никогда оба)
//! - `CoolingDown { remaining }` — таймер cooldown
//!
//! Single mode никогда не остаётся в `Firing` (стреляет и сразу уходит в cooldown),
//! поэтому у `FiringPhase` нет варианта Single.

use bevy::prelude::*;

use super::config::ProjectileType;

/// Состояние оружия
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub enum WeaponState {
    #[default]
    ReadyToFire,

    /// Стрельба в процессе (burst/continuous)
    Firing(FiringPhase),

    /// Ожидание после окончания стрельбы
    CoolingDown {
        /// Секунд до ReadyToFire
        remaining: f32,
    },
}

/// Фаза стрельбы (данные активного режима)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum FiringPhase {
    Burst {
        /// Сколько выстрелов очереди осталось
        shots_remaining: u32,
        /// Секунд до следующего выстрела
        next_shot_in: f32,
        /// Текущий множитель разброса (>= 1.0, растёт внутри очереди)
        error_escalation: f32,
        /// Интервал между выстрелами (из FireMode::Burst)
        interval: f32,
        /// Множитель escalation за выстрел (из FireMode::Burst)
        escalation_per_shot: f32,
    },

    Continuous {
        /// Секунд до автоматической остановки
        time_remaining: f32,
    },
}

/// Дискриминант состояния (без данных) — для логов, событий, тестов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum WeaponStatus {
    ReadyToFire,
    Firing,
    CoolingDown,
}

/// Результат продвижения фазы на один tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseStep {
    /// Ничего не произошло
    Hold,
    /// Выстрелить с данным escalation, продолжать стрелять
    Fire { error_escalation: f32 },
    /// Выстрелить, затем остановиться (последний выстрел burst)
    FireAndStop { error_escalation: f32 },
    /// Время continuous вышло — остановиться без выстрела
    Exhausted,
}

impl WeaponState {
    pub fn status(&self) -> WeaponStatus {
        match self {
            WeaponState::ReadyToFire => WeaponStatus::ReadyToFire,
            WeaponState::Firing(_) => WeaponStatus::Firing,
            WeaponState::CoolingDown { .. } => WeaponStatus::CoolingDown,
        }
    }
}

impl FiringPhase {
    /// Начальная фаза burst после первого выстрела
    ///
    /// `None` — очередь исчерпана первым же выстрелом (size <= 1).
    pub fn burst_after_first_shot(size: u32, interval: f32, escalation_per_shot: f32) -> Option<Self> {
        let shots_remaining = size.saturating_sub(1);
        if shots_remaining == 0 {
            return None;
        }

        Some(FiringPhase::Burst {
            shots_remaining,
            next_shot_in: interval,
            error_escalation: 1.0,
            interval,
            escalation_per_shot,
        })
    }

    /// Начальная фаза continuous
    pub fn continuous(max_duration: f32) -> Self {
        FiringPhase::Continuous {
            time_remaining: max_duration,
        }
    }

    /// Текущий множитель разброса (вне burst всегда 1.0)
    pub fn error_escalation(&self) -> f32 {
        match self {
            FiringPhase::Burst { error_escalation, .. } => *error_escalation,
            FiringPhase::Continuous { .. } => 1.0,
        }
    }

    /// Продвигает таймеры фазы на `delta` секунд
    ///
    /// Continuous hitscan стреляет каждый tick (без интервала): темп стрельбы
    /// привязан к частоте тиков.
    pub fn advance(&mut self, delta: f32, projectile_type: ProjectileType) -> PhaseStep {
        match self {
            FiringPhase::Burst {
                shots_remaining,
                next_shot_in,
                error_escalation,
                interval,
                escalation_per_shot,
            } => {
                *next_shot_in -= delta;
                if *next_shot_in > 0.0 {
                    return PhaseStep::Hold;
                }

                *error_escalation *= *escalation_per_shot;
                *next_shot_in = *interval;
                *shots_remaining = shots_remaining.saturating_sub(1);

                if *shots_remaining == 0 {
                    PhaseStep::FireAndStop {
                        error_escalation: *error_escalation,
                    }
                } else {
                    PhaseStep::Fire {
                        error_escalation: *error_escalation,
                    }
                }
            }

            FiringPhase::Continuous { time_remaining } => {
                *time_remaining -= delta;
                if *time_remaining <= 0.0 {
                    PhaseStep::Exhausted
                } else if projectile_type == ProjectileType::HitScan {
                    PhaseStep::Fire {
                        error_escalation: 1.0,
                    }
                } else {
                    PhaseStep::Hold
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_ready() {
        assert_eq!(WeaponState::default(), WeaponState::ReadyToFire);
        assert_eq!(WeaponState::default().status(), WeaponStatus::ReadyToFire);
    }

    #[test]
    fn test_single_shot_burst_has_no_phase() {
        assert!(FiringPhase::burst_after_first_shot(1, 0.25, 1.5).is_none());
        assert!(FiringPhase::burst_after_first_shot(2, 0.25, 1.5).is_some());
    }

    #[test]
    fn test_burst_phase_escalates_per_shot() {
        let mut phase = FiringPhase::burst_after_first_shot(3, 0.25, 1.5).unwrap();

        assert_eq!(phase.advance(0.125, ProjectileType::HitScan), PhaseStep::Hold);
        assert_eq!(
            phase.advance(0.125, ProjectileType::HitScan),
            PhaseStep::Fire { error_escalation: 1.5 }
        );
        assert_eq!(
            phase.advance(0.25, ProjectileType::HitScan),
            PhaseStep::FireAndStop { error_escalation: 2.25 }
        );
    }

    #[test]
    fn test_burst_phase_uses_its_own_interval_and_factor() {
        let mut phase = FiringPhase::burst_after_first_shot(3, 0.1, 2.0).unwrap();

        assert_eq!(
            phase.advance(0.1, ProjectileType::Projectile),
            PhaseStep::Fire { error_escalation: 2.0 }
        );
        assert!(matches!(
            phase,
            FiringPhase::Burst { shots_remaining: 1, next_shot_in, .. } if next_shot_in == 0.1
        ));
        assert_eq!(
            phase.advance(0.1, ProjectileType::Projectile),
            PhaseStep::FireAndStop { error_escalation: 4.0 }
        );
    }

    #[test]
    fn test_continuous_projectile_holds_until_exhausted() {
        let mut phase = FiringPhase::continuous(0.5);

        assert_eq!(phase.advance(0.25, ProjectileType::Projectile), PhaseStep::Hold);
        assert_eq!(phase.advance(0.25, ProjectileType::Projectile), PhaseStep::Exhausted);
    }

    #[test]
    fn test_continuous_hitscan_fires_every_tick() {
        let mut phase = FiringPhase::continuous(1.0);

        for _ in 0..3 {
            assert_eq!(
                phase.advance(0.25, ProjectileType::HitScan),
                PhaseStep::Fire { error_escalation: 1.0 }
            );
        }
        assert_eq!(phase.advance(0.25, ProjectileType::HitScan), PhaseStep::Exhausted);
    }
}
