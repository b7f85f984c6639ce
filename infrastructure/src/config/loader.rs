//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["mrce.toml", ".mrce.toml"];

/// `[deliberation]` keys that may be overridden as `MRCE_<KEY>`
const ENV_DELIBERATION_KEYS: [&str; 7] = [
    "max_rounds",
    "top_k",
    "gate_min_conf",
    "gate_lambda",
    "goal",
    "mode",
    "oracle_timeout_secs",
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `MRCE_MAX_ROUNDS`, `MRCE_TOP_K`, ... (deliberation keys only)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./mrce.toml` or `./.mrce.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/mrce/config.toml`
    /// 5. Default values
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

        figment = figment.merge(
            Env::prefixed("MRCE_")
                .only(&ENV_DELIBERATION_KEYS)
                .map(|key| format!("deliberation.{}", key).into()),
        );

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/mrce/config.toml` if set,
    /// otherwise the platform config directory equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mrce").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for `--show-config`)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] MRCE_<KEY> for: {}", ENV_DELIBERATION_KEYS.join(", "));

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./mrce.toml or ./.mrce.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.deliberation.max_rounds, 3);
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("mrce"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mrce.toml",
                r#"
[deliberation]
top_k = 2
mode = "attack"
"#,
            )?;
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.deliberation.top_k, 2);
            assert_eq!(config.deliberation.mode, "attack");
            assert_eq!(config.deliberation.max_rounds, 3);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".mrce.toml", "[deliberation]\nmax_rounds = 5\n")?;
            jail.create_file("custom.toml", "[deliberation]\nmax_rounds = 7\n")?;
            let explicit = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| *e)?;
            assert_eq!(config.deliberation.max_rounds, 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("mrce.toml", "[deliberation]\ntop_k = 2\n")?;
            jail.set_env("MRCE_TOP_K", "4");
            jail.set_env("MRCE_GATE_MIN_CONF", "0.5");
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.deliberation.top_k, 4);
            assert_eq!(config.deliberation.gate_min_conf, 0.5);
            Ok(())
        });
    }

    #[test]
    fn test_oracle_env_vars_are_not_config_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("MRCE_LM", "anthropic/claude");
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.oracle.model, "openai/gpt-4o-mini");
            Ok(())
        });
    }
}
