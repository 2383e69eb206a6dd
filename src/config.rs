use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8800/api-v1";
pub const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/jobfinder/image/upload";
pub const DEFAULT_UPLOAD_PRESET: &str = "jobfinder";
/// Pause between a successful save and the page reload, so the success message is visible.
pub const RELOAD_DELAY: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub upload_url: String,
    pub upload_preset: String,
    pub store_path: String,
    pub reload_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            store_path: "store.db".to_string(),
            reload_delay: RELOAD_DELAY,
        }
    }
}

impl Config {
    /// Defaults, overridden by `JOBFINDER_*` variables where the platform has an environment.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_lookup(|key| std::env::var(key).ok())
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("JOBFINDER_API_URL") {
            config.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("JOBFINDER_UPLOAD_URL") {
            config.upload_url = v;
        }
        if let Some(v) = lookup("JOBFINDER_UPLOAD_PRESET") {
            config.upload_preset = v;
        }
        if let Some(v) = lookup("JOBFINDER_STORE") {
            config.store_path = v;
        }
        config
    }
}
