use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::github::Source;
use crate::retry::RetryPolicy;
use crate::time::TimeDuration;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_framework_repo")]
    pub framework_repo: String,
    #[serde(default = "default_skeleton_repo")]
    pub skeleton_repo: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_timeout")]
    pub timeout: TimeDuration,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_key")]
    pub key: String,
    #[serde(default = "default_cache_ttl")]
    pub ttl: TimeDuration,
    #[serde(default = "default_compression_enabled")]
    pub compression_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay: TimeDuration,
}

impl Config {
    /// Load configuration from the default location or a specified path.
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly requested path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", config_path))?;

        if let Some(dir) = config.cache.cache_dir.take() {
            config.cache.cache_dir = Some(expand_tilde(&dir)?);
        }

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("contributors").join("config.toml"))
    }
}

impl GitHubConfig {
    /// Repository name configured for a source
    pub fn repo_for(&self, source: Source) -> &str {
        match source {
            Source::Framework => &self.framework_repo,
            Source::Skeleton => &self.skeleton_repo,
        }
    }
}

impl CacheConfig {
    /// Directory holding cache files, falling back to the platform cache dir
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::cache_dir().context("Could not determine cache directory")?;
                Ok(base.join("contributors"))
            }
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.base_delay.as_duration())
    }
}

/// Expand tilde in paths to home directory
fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix("~/") {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            return Ok(home.join(rest));
        }
    }
    Ok(path.to_path_buf())
}

// Default value functions
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_owner() -> String {
    "orionis-framework".to_string()
}

fn default_framework_repo() -> String {
    Source::Framework.as_str().to_string()
}

fn default_skeleton_repo() -> String {
    Source::Skeleton.as_str().to_string()
}

fn default_user_agent() -> String {
    "Orionis-Framework-Docs".to_string()
}

fn default_accept() -> String {
    "application/vnd.github.v3+json".to_string()
}

fn default_timeout() -> TimeDuration {
    TimeDuration::from_secs(30)
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_key() -> String {
    "orionis_contributors_cache".to_string()
}

fn default_cache_ttl() -> TimeDuration {
    TimeDuration::from_mins(5)
}

fn default_compression_enabled() -> bool {
    false
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> TimeDuration {
    TimeDuration::from_secs(1)
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_base: default_api_base(),
            owner: default_owner(),
            framework_repo: default_framework_repo(),
            skeleton_repo: default_skeleton_repo(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            timeout: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: default_cache_enabled(),
            key: default_cache_key(),
            ttl: default_cache_ttl(),
            compression_enabled: default_compression_enabled(),
            cache_dir: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.owner, "orionis-framework");
        assert_eq!(config.github.repo_for(Source::Framework), "framework");
        assert_eq!(config.github.repo_for(Source::Skeleton), "skeleton");
        assert_eq!(config.github.accept, "application/vnd.github.v3+json");

        assert!(config.cache.enabled);
        assert_eq!(config.cache.key, "orionis_contributors_cache");
        assert_eq!(config.cache.ttl.as_duration(), Duration::from_secs(300));

        let policy = config.retry.policy();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [github]
            owner = "acme"

            [cache]
            ttl = "10m"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.owner, "acme");
        assert_eq!(config.github.framework_repo, "framework");
        assert_eq!(config.cache.ttl.seconds, 600);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let toml_str = r#"
            [retry]
            base_delay = "soon"
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_path_expansion() {
        let home = dirs::home_dir().unwrap();
        let path = PathBuf::from("~/test/path");
        let expanded = expand_tilde(&path).unwrap();

        assert_eq!(expanded, home.join("test/path"));

        let absolute_path = PathBuf::from("/absolute/path");
        let expanded = expand_tilde(&absolute_path).unwrap();
        assert_eq!(expanded, absolute_path);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[github]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("ttl = \"5m\""));

        let config2: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.cache.ttl, config2.cache.ttl);
        assert_eq!(config.github.user_agent, config2.github.user_agent);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nmax_attempts = 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path().unwrap();
        assert!(path.to_string_lossy().ends_with(".config/contributors/config.toml"));
    }
}
