use std::path::Path;

use flatworld_common::Aabb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest accepted `max_altitude`. Every draw pass allocates one bucket per
/// layer.
pub const MAX_ALTITUDE: i32 = 1024;

/// Highest accepted `placement_radius`. A search walks `4r(r+1)` candidates.
pub const MAX_PLACEMENT_RADIUS: u32 = 1024;

/// World configuration: playable area, initial view, camera slack and the
/// tuning knobs of the movement resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Playable area. Leaving it raises a hard out event.
    pub boundary: Aabb,
    /// Initial viewport, clamped into `boundary`.
    pub view: Aabb,
    /// Dead-zone fraction of the view per axis, each in `0..=1`.
    pub view_slack: Vec2,
    /// Highest altitude. This layer is reserved for overlays.
    pub max_altitude: i32,
    /// Rings tried by the placement search.
    pub placement_radius: u32,
    /// Distance between neighbouring placement candidates.
    pub placement_step: f32,
    /// Added to the velocity of gravity-flagged entities each tick.
    pub gravity: Vec2,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            boundary: Aabb::new(Vec2::ZERO, 80.0, 24.0),
            view: Aabb::new(Vec2::ZERO, 80.0, 24.0),
            view_slack: Vec2::ZERO,
            max_altitude: 4,
            placement_radius: 10,
            placement_step: 1.0,
            gravity: Vec2::ZERO,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a YAML document. Omitted fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ALTITUDE).contains(&self.max_altitude) {
            return Err(ConfigError::Invalid(format!(
                "max_altitude must be in 1..={MAX_ALTITUDE}, got {}",
                self.max_altitude
            )));
        }
        if self.placement_radius > MAX_PLACEMENT_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "placement_radius must be at most {MAX_PLACEMENT_RADIUS}, got {}",
                self.placement_radius
            )));
        }
        if !self.placement_step.is_finite() || self.placement_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "placement_step must be positive and finite, got {}",
                self.placement_step
            )));
        }
        for (name, b) in [("boundary", &self.boundary), ("view", &self.view)] {
            if !b.corner.is_finite() || !b.size.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} is not finite: corner {:?} size {:?}",
                    b.corner, b.size
                )));
            }
            if b.size.x < 0.0 || b.size.y < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} has negative size {:?}",
                    b.size
                )));
            }
        }
        for (name, v) in [("view_slack", self.view_slack), ("gravity", self.gravity)] {
            if !v.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} is not finite: {v:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.max_altitude, 4);
        assert_eq!(config.placement_radius, 10);
        assert_eq!(config.placement_step, 1.0);
        assert_eq!(config.view_slack, Vec2::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = WorldConfig::from_yaml_str(
            "boundary:\n  corner: [0.0, 0.0]\n  size: [100.0, 100.0]\nplacement_radius: 3\n",
        )
        .unwrap();
        assert_eq!(config.boundary.size, Vec2::new(100.0, 100.0));
        assert_eq!(config.placement_radius, 3);
        assert_eq!(config.max_altitude, 4);
    }

    #[test]
    fn yaml_round_trip_preserves_values() {
        let config = WorldConfig {
            view_slack: Vec2::new(0.5, 0.25),
            gravity: Vec2::new(0.0, 0.1),
            ..WorldConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(WorldConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        let zero_step = WorldConfig {
            placement_step: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(zero_step.validate(), Err(ConfigError::Invalid(_))));

        let flat = WorldConfig {
            max_altitude: 0,
            ..WorldConfig::default()
        };
        assert!(flat.validate().is_err());

        assert!(matches!(
            WorldConfig::from_yaml_str("max_altitude: [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_oversized_limits() {
        let tall = WorldConfig::from_yaml_str("max_altitude: 2147483647\n");
        assert!(matches!(tall, Err(ConfigError::Invalid(_))));

        let wide = WorldConfig::from_yaml_str("placement_radius: 4000000000\n");
        assert!(matches!(wide, Err(ConfigError::Invalid(_))));

        let at_caps = WorldConfig {
            max_altitude: MAX_ALTITUDE,
            placement_radius: MAX_PLACEMENT_RADIUS,
            ..WorldConfig::default()
        };
        assert!(at_caps.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        let nan_step = WorldConfig {
            placement_step: f32::NAN,
            ..WorldConfig::default()
        };
        assert!(nan_step.validate().is_err());

        let infinite_step = WorldConfig {
            placement_step: f32::INFINITY,
            ..WorldConfig::default()
        };
        assert!(infinite_step.validate().is_err());

        let nan_view = WorldConfig {
            view: Aabb::new(Vec2::ZERO, f32::NAN, 10.0),
            ..WorldConfig::default()
        };
        assert!(matches!(nan_view.validate(), Err(ConfigError::Invalid(_))));

        let nan_boundary = WorldConfig {
            boundary: Aabb::new(Vec2::new(f32::NAN, 0.0), 10.0, 10.0),
            ..WorldConfig::default()
        };
        assert!(nan_boundary.validate().is_err());

        let nan_gravity = WorldConfig {
            gravity: Vec2::new(0.0, f32::NAN),
            ..WorldConfig::default()
        };
        assert!(nan_gravity.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_altitude: 6").unwrap();
        let config = WorldConfig::load(file.path()).unwrap();
        assert_eq!(config.max_altitude, 6);

        let missing = WorldConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
