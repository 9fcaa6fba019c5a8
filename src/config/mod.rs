//! Engine configuration.
//!
//! Configuration is loaded from a YAML file (see `config/engine.yaml`);
//! every setting has a compiled-in default so the engine also runs with no
//! file at all.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, GateSettings, PayrollSettings, SchedulingSettings};
