use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration resolved at startup and optionally overridden by
/// the editor during `initialize`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the flat JSON object supplying `input.` completion
    /// candidates.
    pub input_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("input.json"),
        }
    }
}

impl ServerConfig {
    pub fn apply(&mut self, options: InitOptions) {
        if let Some(path) = options.input_file {
            self.input_file = path;
        }
    }
}

/// Schema for `initializationOptions`. Unknown fields are rejected so a
/// malformed payload fails the `initialize` request instead of being
/// silently ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct InitOptions {
    pub input_file: Option<PathBuf>,
}
