//! Ошибки симуляции стрельбы
//!
//! Две категории:
//! - `ConfigError` — ошибка дизайна (конфиг оружия/снаряда), отклоняется при создании
//! - `CollaboratorError` — отказ внешнего провайдера (raycast, spawn), никогда не фатален
//!
//! Невалидные переходы FSM (start while firing и т.п.) — не ошибки, а `false`.

use thiserror::Error;

/// Ошибка конфигурации: значения не клампятся, а отклоняются
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be at most {max} degrees (got {value})")]
    AngleTooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("burst of {size} shots with escalation x{per_shot} overflows the spread range")]
    EscalationOverflow { size: u32, per_shot: f32 },

    #[error("burst size must be at least 1")]
    EmptyBurst,

    #[error("error escalation per shot must be >= 1.0 (got {0})")]
    EscalationBelowOne(f32),

    #[error("projectile weapons need a projectile kind")]
    MissingProjectileKind,

    #[error("weapon '{weapon}' references unknown projectile kind '{kind}'")]
    UnknownProjectileKind { weapon: String, kind: String },

    #[error("invalid entry '{name}': {source}")]
    Entry {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("failed to parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Отказ внешнего collaborator'а (физика, spawner)
///
/// Ядро понижает такие ошибки до "промах" / "spawn отменён" и только логирует.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    #[error("ray query failed: {0}")]
    RayQueryFailed(String),

    #[error("unknown projectile kind '{0}'")]
    UnknownProjectileKind(String),

    #[error("projectile spawn failed: {0}")]
    SpawnFailed(String),
}

/// Проверка: конечное и >= 0
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Проверка: конечное и > 0
pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}
