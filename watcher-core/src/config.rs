//! TOML config files with a fallback to defaults.
//!
//! Loading happens before the `tracing` subscriber exists, so the loader
//! never logs. It hands back a [`ConfigFallback`] instead, and the binary
//! calls [`ConfigFallback::log`] once logging is up.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// Why a config file was replaced by defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigFallback {
    /// No file at the path.
    Missing(PathBuf),
    /// The file exists but could not be read or parsed.
    Invalid { path: PathBuf, reason: String },
}

impl ConfigFallback {
    /// `info!` for a missing file, `warn!` for an invalid one.
    pub fn log(&self) {
        match self {
            Self::Missing(_) => info!("{self}"),
            Self::Invalid { .. } => warn!("{self}"),
        }
    }
}

impl fmt::Display for ConfigFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "no config at {}; using defaults", path.display()),
            Self::Invalid { path, reason } => {
                write!(f, "invalid config {}: {reason}; using defaults", path.display())
            }
        }
    }
}

/// Parse `path` as TOML, or fall back to `T::default()` and say why.
pub fn load_or_default<T>(path: &Path) -> (T, Option<ConfigFallback>)
where
    T: DeserializeOwned + Default,
{
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return (T::default(), Some(ConfigFallback::Missing(path.to_owned())));
        }
        Err(e) => return (T::default(), Some(invalid(path, e))),
    };
    match toml::from_str(&contents) {
        Ok(config) => (config, None),
        Err(e) => (T::default(), Some(invalid(path, e))),
    }
}

fn invalid(path: &Path, reason: impl fmt::Display) -> ConfigFallback {
    ConfigFallback::Invalid {
        path: path.to_owned(),
        reason: reason.to_string().trim_end().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        port: u16,
        name: String,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                port: 3400,
                name: "default".into(),
            }
        }
    }

    fn temp_file(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "watcher-core-{tag}-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn valid_file_has_no_fallback() {
        let path = temp_file("valid", "port = 8080\n");
        let (cfg, fallback) = load_or_default::<Sample>(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.name, "default");
        assert_eq!(fallback, None);
    }

    #[test]
    fn missing_file_reports_missing() {
        let path = Path::new("/nonexistent/watcher.toml");
        let (cfg, fallback) = load_or_default::<Sample>(path);
        assert_eq!(cfg, Sample::default());
        assert_eq!(fallback, Some(ConfigFallback::Missing(path.to_owned())));
    }

    #[test]
    fn out_of_range_value_reports_invalid() {
        let path = temp_file("range", "port = 99999\nname = \"kept?\"\n");
        let (cfg, fallback) = load_or_default::<Sample>(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg, Sample::default());
        match fallback {
            Some(ConfigFallback::Invalid { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(!reason.is_empty());
            }
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn fallback_messages() {
        let missing = ConfigFallback::Missing(PathBuf::from("agent.toml"));
        assert_eq!(missing.to_string(), "no config at agent.toml; using defaults");
        let invalid = ConfigFallback::Invalid {
            path: PathBuf::from("agent.toml"),
            reason: "expected `=`".into(),
        };
        assert_eq!(
            invalid.to_string(),
            "invalid config agent.toml: expected `=`; using defaults"
        );
    }
}
