//! Core modules for Couplehook

pub mod aligner;
pub mod api;
pub mod assets;
pub mod interaction;
pub mod pivot;
pub mod policy;
pub mod registry;
pub mod scheduler;
pub mod script;
pub mod simulation;
pub mod visibility;
pub mod yard;

pub use aligner::{align_pair, y_look_at, yaw_towards};
pub use api::{create_router, create_router_with_assets, run_server};
pub use assets::{AssetBundle, HookPrefab};
pub use interaction::{CouplingInteraction, InteractionSnapshot};
pub use pivot::{Collider, CouplingPivot, Hook, HookBinding};
pub use policy::{ChainBehavior, CouplingPolicy, LooseChain};
pub use registry::InteractionRegistry;
pub use scheduler::Scheduler;
pub use script::{parse_line, parse_script, Command};
pub use simulation::Simulation;
pub use visibility::{ChainLink, ChainVisuals, VisibilityOptimizer};
pub use yard::{Car, Yard};
