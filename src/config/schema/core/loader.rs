use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.pageroast/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let pageroast_dir = home.join(".pageroast");
        let config_path = pageroast_dir.join("config.toml");

        if !pageroast_dir.exists() {
            fs::create_dir_all(&pageroast_dir).context("Failed to create .pageroast directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                workspace_dir: pageroast_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            fs::create_dir_all(&config.workspace_dir)
                .context("Failed to create workspace directory")?;
            Ok(config)
        }
    }

    /// Load an explicit config file. The workspace lives next to it.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = config_path.to_path_buf();
        config.workspace_dir = config_path
            .parent()
            .map_or_else(|| Path::new(".").join("workspace"), |dir| dir.join("workspace"));
        fs::create_dir_all(&config.workspace_dir)
            .context("Failed to create workspace directory")?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
