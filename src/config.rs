use crate::journal::model::InputLimits;
use crate::refine::Tone;
use anyhow::{Context, Result, anyhow, bail};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".DreamTome";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_MAX_TITLE_LENGTH: usize = 100;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 5000;
const DEFAULT_DEMO_COUNT: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub refine_tone: Tone,
    pub max_title_length: usize,
    pub max_content_length: usize,
    pub demo_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        let root = default_root_dir();

        Self {
            db_path: root.join("journal.db"),
            export_dir: default_export_dir(),
            refine_tone: Tone::default(),
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            demo_count: DEFAULT_DEMO_COUNT,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        default_root_dir().join(CONFIG_FILE)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        set_mode_600(config_path)?;

        Ok(())
    }

    pub fn ensure_bootstrap_files(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        fs::create_dir_all(&self.export_dir).with_context(|| {
            format!(
                "Failed to create export directory: {}",
                self.export_dir.display()
            )
        })?;

        Ok(())
    }

    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_title_chars: self.max_title_length,
            max_content_chars: self.max_content_length,
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_config_key(key) {
            "db_path" => {
                self.db_path = expand_home(value.trim());
            }
            "export_dir" => {
                self.export_dir = expand_home(value.trim());
            }
            "refine_tone" => {
                self.refine_tone = value.parse::<Tone>()?;
            }
            "max_title_length" => {
                self.max_title_length = parse_positive(value, "max_title_length")?;
            }
            "max_content_length" => {
                self.max_content_length = parse_positive(value, "max_content_length")?;
            }
            "demo_count" => {
                self.demo_count = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("demo_count must be a number"))?;
            }
            _ => {
                bail!(
                    "Unsupported config key: {key}. Supported keys: db_path|db.path, export_dir|export.dir, refine_tone|refine.tone, max_title_length|limits.title, max_content_length|limits.content, demo_count|demo.count"
                );
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match normalize_config_key(key) {
            "db_path" => Some(self.db_path.display().to_string()),
            "export_dir" => Some(self.export_dir.display().to_string()),
            "refine_tone" => Some(self.refine_tone.to_string()),
            "max_title_length" => Some(self.max_title_length.to_string()),
            "max_content_length" => Some(self.max_content_length.to_string()),
            "demo_count" => Some(self.demo_count.to_string()),
            _ => None,
        }
    }
}

fn normalize_config_key(key: &str) -> &str {
    match key {
        "db_path" | "db.path" => "db_path",
        "export_dir" | "export.dir" => "export_dir",
        "refine_tone" | "refine.tone" => "refine_tone",
        "max_title_length" | "limits.title" => "max_title_length",
        "max_content_length" | "limits.content" => "max_content_length",
        "demo_count" | "demo.count" => "demo_count",
        _ => key,
    }
}

fn parse_positive(value: &str, name: &str) -> Result<usize> {
    let parsed = value
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("{name} must be a number"))?;
    if parsed == 0 {
        bail!("{name} must be greater than zero");
    }
    Ok(parsed)
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

pub fn default_export_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("DreamTome")
}

fn default_root_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn set_mode_600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set file permissions: {}", path.display()))?;
    }

    Ok(())
}
