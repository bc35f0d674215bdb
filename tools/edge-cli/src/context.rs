//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["edge.toml", ".edge.toml", "edge.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd, &output) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    ///
    /// Runs before the log subscriber exists, so unreadable files are
    /// reported through `output`.
    fn find_config(start: &Path, output: &Output) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config_path, config)),
                        Err(e) => output.warn(&format!(
                            "Skipping unreadable config {}: {:#}",
                            config_path.display(),
                            e
                        )),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Output {
        Output::new(false, true)
    }

    #[test]
    fn test_find_config_walks_parents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("edge.toml"),
            "[adapter]\ndefault_method = \"post\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = Context::find_config(&nested, &quiet()).unwrap();

        assert_eq!(path, dir.path().join("edge.toml"));
        assert_eq!(config.adapter.default_method, "post");
    }

    #[test]
    fn test_find_config_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge.toml"), "").unwrap();
        std::fs::write(dir.path().join("edge.json"), "{}").unwrap();

        let (path, _) = Context::find_config(dir.path(), &quiet()).unwrap();
        assert!(path.ends_with("edge.toml"));
    }

    #[test]
    fn test_find_config_skips_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("edge.toml"),
            "[adapter]\nlog_format = \"xml\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("edge.json"), r#"{"adapter": {"log_format": "json"}}"#)
            .unwrap();

        let (path, config) = Context::find_config(dir.path(), &quiet()).unwrap();
        assert!(path.ends_with("edge.json"));
        assert_eq!(config.adapter.log_format, edge_observability::LogFormat::Json);
    }
}
