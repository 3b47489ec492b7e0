// Configuration module
// Public interface for configuration loading

mod backend;
pub mod constants;
mod loader;
mod settings;

pub use backend::{Backend, BackendPreset};
pub use loader::{apply_env_overrides, default_config_path, load_settings};
pub use settings::Settings;
