//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./duel.toml` or `./.duel.toml`
    /// 3. Global: `~/.config/trivia-duel/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("trivia-duel").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["duel.toml", ".duel.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_skips_all_files() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.timeout_secs, 60);
        assert!(config.transcript.enabled);
    }

    #[test]
    fn test_explicit_file_pins_every_field() {
        // The explicit path is the highest-priority source, so setting
        // every field makes the outcome independent of any user-level
        // or project-level config on the machine running the test.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duel.toml");
        std::fs::write(
            &path,
            r#"
            [agent]
            endpoint = "http://localhost:9999/agents/call"
            agent_id = "pinned-agent"
            timeout_secs = 7

            [transcript]
            enabled = false
            path = "elsewhere.jsonl"
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.agent.endpoint, "http://localhost:9999/agents/call");
        assert_eq!(config.agent.agent_id, "pinned-agent");
        assert_eq!(config.agent.timeout_secs, 7);
        assert!(!config.transcript.enabled);
        assert_eq!(
            config.transcript.path,
            std::path::PathBuf::from("elsewhere.jsonl")
        );
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duel.toml");
        std::fs::write(
            &path,
            r#"
            [agent]
            timeout_secs = 5

            [transcript]
            enabled = false
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        // Fields the explicit file sets always win, whatever lower
        // priority sources say.
        assert_eq!(config.agent.timeout_secs, 5);
        assert!(!config.transcript.enabled);
    }
}
