use std::path::PathBuf;

const APP_DIR: &str = "com.smartstudy.app";

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "SMARTSTUDY_DATA_DIR";

/// Platform-specific application directory holding config and data
pub fn app_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support");
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share");
            dir.push(APP_DIR);
            return dir;
        }
    }

    // Fallback
    PathBuf::from(".")
}

/// Default data directory, honouring the environment override
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    app_dir().join("data")
}

pub fn config_path() -> PathBuf {
    app_dir().join("smartstudy.toml")
}
