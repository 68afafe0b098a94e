//! Tunables: zombie perception/behavior, player noise, survival round.
//!
//! Все значения статичны per-agent: задаются при спавне, FSM их не меняет.
//! Загрузка из TOML (`HordeSettings::load`) + валидация.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Параметры зомби (perception + speeds + wander/search + screech)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    /// Дальность зрения (горизонтальная плоскость)
    pub vision_radius: f32,
    /// Полный угол конуса зрения, градусы
    pub vision_angle: f32,
    /// Высота глаз над позицией агента (origin LOS луча)
    pub eye_height: f32,
    /// Высота точки прицеливания над позицией игрока
    pub target_eye_height: f32,
    /// Какие слои блокируют взгляд (bitmask, см. `perception::occlusion`)
    pub vision_blockers: u32,

    /// Добавка к радиусу любого звука
    pub hearing_boost: f32,

    pub wander_speed: f32,
    pub investigate_speed: f32,
    pub chase_speed: f32,

    /// Насколько далеко от spawn point бродим
    pub wander_radius: f32,
    pub wander_point_tolerance: f32,
    /// Как часто выбираем новую wander точку (секунды)
    pub wander_repath_time: f32,
    /// Max distance для snap wander точки на navmesh
    pub wander_snap_distance: f32,

    pub investigate_point_tolerance: f32,
    pub search_duration: f32,
    pub search_radius: f32,
    pub search_point_tolerance: f32,
    pub search_snap_distance: f32,

    pub enable_screech: bool,
    pub screech_radius: f32,
    pub screech_cooldown: f32,
    pub min_screech_pitch: f32,
    pub max_screech_pitch: f32,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            vision_radius: 6.0,
            vision_angle: 60.0,
            eye_height: 1.2,
            target_eye_height: 1.0,
            vision_blockers: crate::perception::LAYER_ENVIRONMENT | crate::perception::LAYER_PROPS,
            hearing_boost: 0.0,
            wander_speed: 2.5,
            investigate_speed: 3.0,
            chase_speed: 5.0,
            wander_radius: 10.0,
            wander_point_tolerance: 1.2,
            wander_repath_time: 1.5,
            wander_snap_distance: 2.5,
            investigate_point_tolerance: 1.5,
            search_duration: 3.0,
            search_radius: 4.0,
            search_point_tolerance: 1.2,
            search_snap_distance: 2.0,
            enable_screech: true,
            screech_radius: 15.0,
            screech_cooldown: 5.0,
            min_screech_pitch: 0.9,
            max_screech_pitch: 1.1,
        }
    }
}

impl ZombieConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("vision_radius", self.vision_radius)?;
        if !(0.0..=180.0).contains(&self.vision_angle) {
            return Err(invalid("vision_angle", format!("{} is outside [0, 180]", self.vision_angle)));
        }
        non_negative("hearing_boost", self.hearing_boost)?;
        non_negative("wander_speed", self.wander_speed)?;
        non_negative("investigate_speed", self.investigate_speed)?;
        non_negative("chase_speed", self.chase_speed)?;
        non_negative("wander_radius", self.wander_radius)?;
        non_negative("wander_point_tolerance", self.wander_point_tolerance)?;
        non_negative("wander_repath_time", self.wander_repath_time)?;
        non_negative("wander_snap_distance", self.wander_snap_distance)?;
        non_negative("investigate_point_tolerance", self.investigate_point_tolerance)?;
        non_negative("search_duration", self.search_duration)?;
        non_negative("search_radius", self.search_radius)?;
        non_negative("search_point_tolerance", self.search_point_tolerance)?;
        non_negative("search_snap_distance", self.search_snap_distance)?;
        non_negative("screech_radius", self.screech_radius)?;
        non_negative("screech_cooldown", self.screech_cooldown)?;
        if self.min_screech_pitch > self.max_screech_pitch {
            return Err(invalid(
                "min_screech_pitch",
                format!("{} is above max_screech_pitch {}", self.min_screech_pitch, self.max_screech_pitch),
            ));
        }
        Ok(())
    }
}

/// Шум игрока: выстрелы и шаги
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub gunshot_radius: f32,
    pub footstep_radius: f32,
    /// Секунды между шагами во время движения
    pub step_interval: f32,
    /// Горизонтальная скорость, выше которой игрок "идёт"
    pub min_move_speed: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gunshot_radius: 25.0,
            footstep_radius: 6.0,
            step_interval: 0.5,
            min_move_speed: 0.1,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("gunshot_radius", self.gunshot_radius)?;
        non_negative("footstep_radius", self.footstep_radius)?;
        non_negative("step_interval", self.step_interval)?;
        non_negative("min_move_speed", self.min_move_speed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Сколько надо продержаться (секунды)
    pub round_time: f32,
    pub points_per_kill: u32,
    /// Дистанция касания зомби → игрок погиб
    pub contact_radius: f32,
    pub zombie_health: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_time: 120.0,
            points_per_kill: 1,
            contact_radius: 1.0,
            zombie_health: 100,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("round_time", self.round_time)?;
        non_negative("contact_radius", self.contact_radius)?;
        if self.zombie_health == 0 {
            return Err(invalid("zombie_health", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Все настройки одним файлом
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HordeSettings {
    pub zombie: ZombieConfig,
    pub noise: NoiseConfig,
    pub round: RoundConfig,
}

impl HordeSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: HordeSettings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zombie.validate()?;
        self.noise.validate()?;
        self.round.validate()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be a finite value >= 0", value)))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zombie_config_default() {
        let config = ZombieConfig::default();
        assert_eq!(config.vision_radius, 6.0);
        assert_eq!(config.vision_angle, 60.0);
        assert_eq!(config.chase_speed, 5.0);
        assert_eq!(config.search_duration, 3.0);
        assert_eq!(config.screech_radius, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = HordeSettings::from_toml_str(
            r#"
            [zombie]
            vision_radius = 12.0
            hearing_boost = 2.5

            [noise]
            gunshot_radius = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.zombie.vision_radius, 12.0);
        assert_eq!(settings.zombie.hearing_boost, 2.5);
        assert_eq!(settings.zombie.wander_speed, 2.5);
        assert_eq!(settings.noise.gunshot_radius, 40.0);
        assert_eq!(settings.noise.footstep_radius, 6.0);
        assert_eq!(settings.round, RoundConfig::default());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = HordeSettings::from_toml_str("[zombie]\nscreech_radius = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "screech_radius", .. }));
    }

    #[test]
    fn test_inverted_pitch_range_rejected() {
        let config = ZombieConfig {
            min_screech_pitch: 1.5,
            max_screech_pitch: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "min_screech_pitch", .. })
        ));
    }

    #[test]
    fn test_vision_angle_out_of_range_rejected() {
        let wide = ZombieConfig {
            vision_angle: 181.0,
            ..Default::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::Invalid { field: "vision_angle", .. })
        ));

        let limit = ZombieConfig {
            vision_angle: 180.0,
            ..Default::default()
        };
        assert!(limit.validate().is_ok());
    }

    #[test]
    fn test_settings_survive_toml_round_trip() {
        let settings = HordeSettings {
            zombie: ZombieConfig {
                vision_angle: 90.0,
                enable_screech: false,
                ..Default::default()
            },
            round: RoundConfig {
                zombie_health: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        let text = toml::to_string(&settings).unwrap();
        assert_eq!(HordeSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = HordeSettings::from_toml_str("[zombie\nvision_radius = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = HordeSettings::load("/definitely/not/here/horde.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
