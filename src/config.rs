//! Runtime configuration from environment variables.
//!
//! | Variable            | Meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `JEELS_CONTENT_URL` | Base URL content is fetched from          |
//! | `JEELS_CONTENT_DIR` | Local directory holding `content/`        |
//! | `JEELS_DATA_DIR`    | Where learner records are persisted       |

use crate::error::ConfigError;
use crate::lesson::{ContentSource, FsContentSource, HttpContentSource};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

const DEFAULT_CONTENT_DIR: &str = "./public";
const DEFAULT_DATA_DIR: &str = "./.jeels";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Http(Url),
    Dir(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub content: ContentLocation,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentLocation::Dir(PathBuf::from(DEFAULT_CONTENT_DIR)),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from an explicit set of variables. Unset or empty variables take
    /// their defaults; a URL wins over a directory when both are given.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();

        let content = match (vars.get("JEELS_CONTENT_URL"), vars.get("JEELS_CONTENT_DIR")) {
            (Some(url), _) => ContentLocation::Http(Url::parse(url.trim()).map_err(|source| {
                ConfigError::InvalidUrl {
                    var: "JEELS_CONTENT_URL",
                    source,
                }
            })?),
            (None, Some(dir)) => ContentLocation::Dir(PathBuf::from(dir)),
            (None, None) => ContentLocation::Dir(PathBuf::from(DEFAULT_CONTENT_DIR)),
        };
        let data_dir = vars
            .get("JEELS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self { content, data_dir })
    }

    pub fn content_source(&self) -> Arc<dyn ContentSource> {
        match &self.content {
            ContentLocation::Http(url) => Arc::new(HttpContentSource::new(url.clone())),
            ContentLocation::Dir(dir) => Arc::new(FsContentSource::new(dir.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn url_takes_precedence() {
        let config = Config::from_vars([
            ("JEELS_CONTENT_URL", "https://jeels.example/"),
            ("JEELS_CONTENT_DIR", "/srv/public"),
            ("JEELS_DATA_DIR", "/var/lib/jeels"),
        ])
        .unwrap();

        assert_eq!(
            config.content,
            ContentLocation::Http(Url::parse("https://jeels.example/").unwrap())
        );
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/jeels"));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = Config::from_vars([("JEELS_CONTENT_URL", " "), ("JEELS_CONTENT_DIR", "site")])
            .unwrap();
        assert_eq!(config.content, ContentLocation::Dir(PathBuf::from("site")));
    }

    #[test]
    fn rejects_bad_url() {
        let err = Config::from_vars([("JEELS_CONTENT_URL", "not a url")]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JEELS_CONTENT_URL"));
    }
}
