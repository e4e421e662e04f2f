// ⚙️ Configuration - where data lives and how the console presents itself

use std::path::PathBuf;

pub const DEFAULT_FILE_PATH: &str = "file.json";
pub const DEFAULT_PROMPT: &str = "(hbnb) ";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON document holding every stored object
    pub file_path: PathBuf,

    /// Prompt shown by the interactive console
    pub prompt: String,

    /// tracing filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Config {
    pub fn new() -> Self {
        Config {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            prompt: DEFAULT_PROMPT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.file_path, PathBuf::from("file.json"));
        assert_eq!(config.prompt, "(hbnb) ");
        assert_eq!(config.log_filter, "warn");
    }
}
