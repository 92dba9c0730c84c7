//! Configuration for the ticket board and the local web server.
//!
//! Handles loading and validating YAML or TOML config files and resolving
//! where preferences live.

mod declarative;
mod path;
mod schema;

pub use declarative::{ConfigFormat, load_config, load_config_from_str, load_or_default};
pub use path::{
    APP_DIR, CONFIG_FILE, app_dir, default_config_path, expand_home, home_dir, resolve_state_dir,
};
pub use schema::{BoardConfig, LottoConfig, ServeConfig};
