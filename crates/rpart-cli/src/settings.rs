//! Config loading, flag overrides, and tracing setup.

use std::fs;
use std::path::Path;

use rpart_tree::EditorConfig;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless.
pub fn init_tracing(level: Option<&str>, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_LOG_FILTER)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
}

/// Load and validate the editor config; defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::MissingPath {
                    path: path.to_path_buf(),
                });
            }
            let raw = fs::read_to_string(path)?;
            let config: EditorConfig = toml::from_str(&raw)?;
            debug!(path = %path.display(), "config loaded");
            config
        }
        None => EditorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Read and decode a JSON input file (script or snapshot).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CliError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| CliError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `--width`/`--height` on top of a loaded config.
pub fn with_canvas_overrides(
    mut config: EditorConfig,
    width: Option<u16>,
    height: Option<u16>,
) -> Result<EditorConfig> {
    if let Some(width) = width {
        config.canvas.width = width;
    }
    if let Some(height) = height {
        config.canvas.height = height;
    }
    config.validate()?;
    Ok(config)
}
