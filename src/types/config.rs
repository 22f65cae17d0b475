//! Hook configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::CouplingError;
use crate::{HEIGHT_OFFSET, HOOK_LAYER, HOOK_MATERIAL_SOURCE, PIVOT_LENGTH};

/// Coupler model selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplerType {
    /// Stock buffer-and-chain coupling, host behaviour untouched
    #[default]
    Chain,
    /// Rigid knuckle hook
    JanneyKnuckle,
}

/// Configuration handed to the interaction registry at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub coupler_type: CouplerType,
    #[serde(default = "default_pivot_length")]
    pub pivot_length: f32,
    #[serde(default = "default_height_offset")]
    pub height_offset: f32,
    #[serde(default = "default_hook_layer")]
    pub hook_layer: String,
    #[serde(default = "default_material_source")]
    pub material_source: String,
}

fn default_pivot_length() -> f32 {
    PIVOT_LENGTH
}

fn default_height_offset() -> f32 {
    HEIGHT_OFFSET
}

fn default_hook_layer() -> String {
    HOOK_LAYER.to_string()
}

fn default_material_source() -> String {
    HOOK_MATERIAL_SOURCE.to_string()
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            coupler_type: CouplerType::default(),
            pivot_length: PIVOT_LENGTH,
            height_offset: HEIGHT_OFFSET,
            hook_layer: default_hook_layer(),
            material_source: default_material_source(),
        }
    }
}

impl HookConfig {
    /// Rigid hook mode with default geometry
    pub fn knuckle() -> Self {
        Self {
            coupler_type: CouplerType::JanneyKnuckle,
            ..Self::default()
        }
    }

    /// Stock chain mode
    pub fn chain() -> Self {
        Self::default()
    }

    /// Whether the hook overrides are active
    pub fn hook_enabled(&self) -> bool {
        self.coupler_type == CouplerType::JanneyKnuckle
    }

    /// Pivot position relative to its coupler
    pub fn pivot_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height_offset, -self.pivot_length)
    }

    /// Read a JSON config file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CouplingError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| CouplingError::ConfigIo {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CouplingError::ConfigFormat {
            path: display,
            source,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_chain() {
        let config = HookConfig::default();
        assert!(!config.hook_enabled());
        assert_eq!(config.pivot_length, 1.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: HookConfig =
            serde_json::from_str(r#"{"coupler_type": "janney_knuckle"}"#).unwrap();
        assert!(config.hook_enabled());
        assert_eq!(config.height_offset, HEIGHT_OFFSET);
        assert_eq!(config.hook_layer, "Interactable");
    }

    #[test]
    fn test_pivot_offset_points_back() {
        let offset = HookConfig::knuckle().pivot_offset();
        assert_eq!(offset, Vec3::new(0.0, -0.067, -1.0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HookConfig::load("/nonexistent/couplehook.json").unwrap_err();
        assert!(matches!(err, CouplingError::ConfigIo { .. }));
    }
}
