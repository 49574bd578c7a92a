use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// World Weather Online premium forecast endpoint.
pub const DEFAULT_BASE_URL: &str = "http://api.worldweatheronline.com/premium/v1/weather.ashx";

pub const DEFAULT_NUM_OF_DAYS: u32 = 7;

/// Longest horizon the service will return.
pub const MAX_NUM_OF_DAYS: u32 = 14;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// num_of_days = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,

    /// Default forecast horizon when none is given on the command line.
    pub num_of_days: Option<u32>,
}

/// Immutable settings handed to a forecast provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Config {
    /// Stored config, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .with_context(|| format!("Invalid config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read config file {}", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if let Some(days) = cfg.num_of_days {
            validate_num_of_days(days)?;
        }
        Ok(cfg)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Writes TOML to `path`, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create config directory {}", dir.display()))?;
        }

        let text = toml::to_string_pretty(self).context("Cannot serialize config")?;
        fs::write(path, text)
            .with_context(|| format!("Cannot write config file {}", path.display()))
    }

    /// `config.toml` under the platform config dir for `skiweather`.
    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "skiweather", "skiweather")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow!("No config directory available on this platform"))
    }

    /// API key from the environment if given, else the stored one.
    pub fn resolve_api_key(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `skiweather configure` or set API_KEY in the environment (or .env)."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Explicit horizon wins over the stored default.
    pub fn resolve_num_of_days(&self, explicit: Option<u32>) -> Result<u32> {
        let days = explicit.or(self.num_of_days).unwrap_or(DEFAULT_NUM_OF_DAYS);
        validate_num_of_days(days)?;
        Ok(days)
    }

    pub fn client_config(&self, from_env: Option<String>) -> Result<ClientConfig> {
        let api_key = self.resolve_api_key(from_env)?;
        Ok(ClientConfig::new(api_key).with_base_url(self.base_url()))
    }
}

pub fn validate_num_of_days(days: u32) -> Result<()> {
    if !(1..=MAX_NUM_OF_DAYS).contains(&days) {
        bail!("num_of_days must be between 1 and {MAX_NUM_OF_DAYS}, got {days}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_errors_with_hint() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(None).unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("skiweather configure"));
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let cfg = Config { api_key: Some("STORED".into()), ..Config::default() };

        assert_eq!(cfg.resolve_api_key(Some("ENV".into())).unwrap(), "ENV");
        assert_eq!(cfg.resolve_api_key(Some("  ".into())).unwrap(), "STORED");
        assert_eq!(cfg.resolve_api_key(None).unwrap(), "STORED");
    }

    #[test]
    fn client_config_uses_default_endpoint() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        let client = cfg.client_config(None).unwrap();

        assert_eq!(client, ClientConfig::new("KEY"));
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_override_is_threaded_through() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://localhost:8080/weather".into()),
            num_of_days: None,
        };

        assert_eq!(cfg.client_config(None).unwrap().base_url, "http://localhost:8080/weather");
    }

    #[test]
    fn num_of_days_resolution() {
        let cfg = Config { num_of_days: Some(3), ..Config::default() };

        assert_eq!(cfg.resolve_num_of_days(None).unwrap(), 3);
        assert_eq!(cfg.resolve_num_of_days(Some(10)).unwrap(), 10);
        assert_eq!(Config::default().resolve_num_of_days(None).unwrap(), DEFAULT_NUM_OF_DAYS);
        assert!(cfg.resolve_num_of_days(Some(0)).is_err());
        assert!(cfg.resolve_num_of_days(Some(MAX_NUM_OF_DAYS + 1)).is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: None,
            num_of_days: Some(5),
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_creates_directories_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://localhost:9000/weather.ashx".into()),
            num_of_days: Some(3),
        };

        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "num_of_days = \"seven\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn stored_out_of_range_horizon_is_rejected() {
        assert!(Config::from_toml("num_of_days = 40").is_err());
    }
}
