pub mod paths;
pub mod settings;

pub use settings::{get_app_config, load_app_config_from, AppConfig};
