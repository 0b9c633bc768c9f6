//! Configuration file loader with multi-source merging

use super::file_config::{ConfigurationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "dojo.toml";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `DOJO_` environment variables (`DOJO_CHAT__MODEL=qwen-3-32b`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./dojo.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/startup-dojo/config.toml`
    /// 5. Default values
    ///
    /// `QDRANT_HOST` / `QDRANT_PORT` are applied last.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigurationError> {
        let figment = Self::figment(
            Self::global_config_path().as_deref(),
            Some(Path::new(PROJECT_CONFIG_FILE)),
            config_path,
        );
        let mut config: FileConfig = figment.extract().map_err(Box::new)?;
        config.retrieval.apply_qdrant_overrides(
            std::env::var("QDRANT_HOST").ok(),
            std::env::var("QDRANT_PORT").ok(),
        );
        Ok(config)
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // An explicit path that does not exist is an error, not a silent skip
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed("DOJO_").split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("startup-dojo").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] DOJO_* variables (section__key)");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{}", PROJECT_CONFIG_FILE);
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.chat.model, "llama-3.3-70b");
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("startup-dojo"));
    }

    #[test]
    fn test_project_overrides_global_and_explicit_overrides_project() {
        let dir = tempfile::tempdir().unwrap();
        let global = write_toml(
            &dir,
            "global.toml",
            "[chat]\nmodel = \"gpt-oss-120b\"\nmax_tokens = 1000\n",
        );
        let project = write_toml(&dir, "dojo.toml", "[chat]\nmodel = \"qwen-3-32b\"\n");
        let explicit = write_toml(&dir, "explicit.toml", "[retrieval]\ntop_k = 7\n");

        let config: FileConfig = ConfigLoader::figment(
            Some(&global),
            Some(&project),
            Some(&explicit),
        )
        .extract()
        .unwrap();

        assert_eq!(config.chat.model, "qwen-3-32b");
        assert_eq!(config.chat.max_tokens, 1000);
        assert_eq!(config.retrieval.top_k, 7);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, None, Some(&missing)).extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let config: FileConfig = ConfigLoader::figment(Some(&missing), Some(&missing), None)
            .extract()
            .unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
