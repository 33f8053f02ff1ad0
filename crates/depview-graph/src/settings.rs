use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// Tunables for every layout the registry can build.
///
/// Missing fields fall back to their defaults, so a settings file only needs to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Slots between adjacent siblings in the tree layouts
    pub gap: f32,
    /// Slots between adjacent root subtrees
    pub margin: f32,
    /// Planar tree: horizontal distance per depth level
    pub expand_x: f32,
    /// Planar tree: vertical distance per offset slot
    pub expand_y: f32,
    /// Radial tree: radius added per depth level
    pub ring_spacing: f32,
    /// Grid layout: distance between cells
    pub grid_spacing: f32,
    /// Progress estimate reported by iterative runners
    pub iteration_cost: usize,
    /// Hard step limit for runners whose algorithm never reports convergence
    pub step_budget: usize,
    /// Bounding dimensions below this are treated as empty when fitting to a viewport
    pub zero_threshold: f32,
    pub repulsion: RepulsionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionSettings {
    pub strength: f32,
    pub min_distance: f32,
    pub damping: f32,
}

impl Default for RepulsionSettings {
    fn default() -> Self {
        Self {
            strength: 500.0,
            min_distance: 20.0,
            damping: 0.3,
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            gap: 1.0,
            margin: 1.0,
            expand_x: Self::DEFAULT_EXPAND_X,
            expand_y: 1.0,
            ring_spacing: 1.0,
            grid_spacing: 10.0,
            iteration_cost: 1000,
            step_budget: 200,
            zero_threshold: 0.0,
            repulsion: RepulsionSettings::default(),
        }
    }
}

impl LayoutSettings {
    /// Keeps labels at adjacent depths from overlapping.
    pub const DEFAULT_EXPAND_X: f32 = 12.0;

    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        let spacings = [
            ("gap", self.gap),
            ("margin", self.margin),
            ("expand_y", self.expand_y),
            ("grid_spacing", self.grid_spacing),
            ("zero_threshold", self.zero_threshold),
            ("repulsion.min_distance", self.repulsion.min_distance),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidSettings(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        // Depth must always move a node outward, or distinct levels collapse together.
        for (name, value) in [("expand_x", self.expand_x), ("ring_spacing", self.ring_spacing)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GraphError::InvalidSettings(format!(
                    "{name} must be a finite, positive number (got {value})"
                )));
            }
        }

        if self.step_budget == 0 {
            return Err(GraphError::InvalidSettings(
                "step_budget must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.repulsion.damping) {
            return Err(GraphError::InvalidSettings(format!(
                "repulsion.damping must be within 0..=1 (got {})",
                self.repulsion.damping
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            LayoutSettings::from_json_str(r#"{"expand_x": 20.0, "repulsion": {"damping": 0.5}}"#)
                .unwrap();

        assert_eq!(settings.expand_x, 20.0);
        assert_eq!(settings.gap, 1.0);
        assert_eq!(settings.repulsion.damping, 0.5);
        assert_eq!(settings.repulsion.strength, 500.0);
    }

    #[test]
    fn defaults_are_valid() {
        let settings = LayoutSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.expand_x, LayoutSettings::DEFAULT_EXPAND_X);
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let err = LayoutSettings::from_json_str(r#"{"gap": -1.0}"#).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSettings(msg) if msg.contains("gap")));
    }

    #[test]
    fn zero_depth_spacing_is_rejected() {
        for json in [r#"{"expand_x": 0.0}"#, r#"{"ring_spacing": 0.0}"#] {
            let err = LayoutSettings::from_json_str(json).unwrap_err();
            assert!(
                matches!(&err, GraphError::InvalidSettings(msg) if msg.contains("positive")),
                "{json}: {err}"
            );
        }
        assert!(LayoutSettings::from_json_str(r#"{"gap": 0.0, "margin": 0.0}"#).is_ok());
    }

    #[test]
    fn zero_step_budget_is_rejected() {
        let err = LayoutSettings::from_json_str(r#"{"step_budget": 0}"#).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSettings(_)));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = LayoutSettings::from_json_str("{gap: 1").unwrap_err();
        assert!(matches!(err, GraphError::SettingsParse(_)));
    }
}
