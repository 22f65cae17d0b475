//! Couplehook: rigid hook coupling between adjacent rail vehicles
//!
//! Per-coupler interaction state machine, hook pivot geometry and the
//! partner link protocol, driven by a host-owned tick scheduler.

pub mod core;
pub mod types;

// =============================================================================
// HOOK GEOMETRY [C]
// =============================================================================

/// Distance from the coupler back to the hook pivot
pub const PIVOT_LENGTH: f32 = 1.0;

/// Vertical offset of the pivot relative to the coupler
pub const HEIGHT_OFFSET: f32 = -0.067;

/// Name of the pivot child created under each coupler
pub const PIVOT_NAME: &str = "hook pivot";

// =============================================================================
// ASSETS [C]
// =============================================================================

/// Prefab name of the hook inside the asset bundle
pub const HOOK_PREFAB: &str = "hook";

/// Layer the hook is placed on so the player can interact with it
pub const HOOK_LAYER: &str = "Interactable";

/// Child path of the renderer whose material the hook borrows
pub const HOOK_MATERIAL_SOURCE: &str = "[buffers]/HookPlate_F";

// =============================================================================
// REFERENCE YARD [C]
// =============================================================================

/// Default car length used by the reference yard
pub const CAR_LENGTH: f32 = 12.0;

/// Number of chain links a coupler shows under the stock chain model
pub const CHAIN_LINK_COUNT: usize = 5;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
