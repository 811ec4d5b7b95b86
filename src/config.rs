use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{errors::IoError, tree::DuplicatePolicy, utils::normalize_path};

pub const CONFIG_FILE_NAME: &str = "playtree.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(playtree::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(playtree::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct TreeInfo {
    pub path: String,
}

/// Contents of `playtree.toml`:
///
/// ```toml
/// duplicates = "overwrite"
///
/// [trees.react]
/// path = "trees/react.json"
/// ```
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    /// Named tree files, in declaration order.
    #[serde(default)]
    pub trees: IndexMap<String, TreeInfo>,
    /// Directory the config was read from; tree paths are relative to it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|error| IoError::read(path, error))?;

        let mut parsed: Config =
            toml::from_str(&content).map_err(|error| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: error,
            })?;

        parsed.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(parsed)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("no config at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Resolves a tree reference: a name from `[trees]`, or else a path to a
    /// tree file as given.
    pub fn tree_file(&self, reference: &str) -> PathBuf {
        match self.trees.get(reference) {
            Some(info) => self.base_dir.join(normalize_path(&info.path)),
            None => PathBuf::from(reference),
        }
    }
}
