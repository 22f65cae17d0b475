//! Hook asset provisioning
//!
//! The bundle is fetched once at startup. A missing bundle or prefab is a
//! startup failure; nothing on the tick path loads assets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::CouplingError;
use crate::HOOK_PREFAB;

/// Visual + collision template for the hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookPrefab {
    pub name: String,
    pub mesh: String,
    #[serde(default = "default_true")]
    pub convex: bool,
    #[serde(default = "default_true")]
    pub is_trigger: bool,
}

fn default_true() -> bool {
    true
}

impl HookPrefab {
    /// The knuckle hook shipped with the crate
    pub fn builtin() -> Self {
        Self {
            name: HOOK_PREFAB.to_string(),
            mesh: "knuckle_hook".to_string(),
            convex: true,
            is_trigger: true,
        }
    }
}

/// A named set of prefabs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub name: String,
    pub prefabs: Vec<HookPrefab>,
}

impl AssetBundle {
    /// Bundle shipped with the crate
    pub fn builtin() -> Self {
        Self {
            name: "knucklecoupler".to_string(),
            prefabs: vec![HookPrefab::builtin()],
        }
    }

    /// Load a JSON bundle manifest
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CouplingError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| CouplingError::AssetIo {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CouplingError::AssetFormat {
            path: display,
            source,
        })
    }

    pub fn prefab(&self, name: &str) -> Result<&HookPrefab, CouplingError> {
        self.prefabs
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CouplingError::MissingPrefab(name.to_string()))
    }

    /// The hook prefab every pivot is built from
    pub fn hook(&self) -> Result<&HookPrefab, CouplingError> {
        self.prefab(HOOK_PREFAB)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_hook() {
        let bundle = AssetBundle::builtin();
        let hook = bundle.hook().unwrap();
        assert!(hook.convex);
        assert!(hook.is_trigger);
    }

    #[test]
    fn test_missing_prefab() {
        let bundle = AssetBundle {
            name: "empty".to_string(),
            prefabs: Vec::new(),
        };
        assert!(matches!(bundle.hook(), Err(CouplingError::MissingPrefab(_))));
    }

    #[test]
    fn test_manifest_defaults() {
        let bundle: AssetBundle = serde_json::from_str(
            r#"{"name": "custom", "prefabs": [{"name": "hook", "mesh": "m"}]}"#,
        )
        .unwrap();
        assert!(bundle.hook().unwrap().is_trigger);
    }
}
