use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Config file ───────────────────────────────────────────────────────────────

/// On-disk settings, all optional with sensible defaults. The settings
/// overlay writes changes back through `save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Spaces inserted per Tab keypress in the editor pane.
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,
    /// Show dotfiles in the explorer and quick-open palette.
    #[serde(default)]
    pub show_hidden: bool,
    /// Shell used for terminal and Run commands (`<shell> -c <command>`).
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Python interpreter used by the inspection tools.
    #[serde(default = "default_python")]
    pub python: String,
}

fn default_tab_width() -> u8 {
    4
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            show_hidden: false,
            shell: default_shell(),
            python: default_python(),
        }
    }
}

impl ConfigFile {
    /// Load from disk, or return defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Write a starter config file to disk (only if it doesn't exist).
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = config_path();
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        Ok(path)
    }

    /// Persist the current settings (used by the settings overlay).
    pub fn save(&self) -> Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(&path, raw)
            .with_context(|| format!("Failed to write config file at {}", path.display()))
    }
}

// ── Resolved runtime config (after merging file + CLI overrides) ──────────────

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Workspace root every relative operation resolves against.
    pub root: PathBuf,
    pub tab_width: u8,
    pub show_hidden: bool,
    pub shell: String,
    pub python: String,
}

impl ResolvedConfig {
    /// Merge config file with CLI overrides.
    /// Priority: CLI args > env vars (handled by clap) > config file > defaults
    pub fn resolve(
        file: &ConfigFile,
        root: PathBuf,
        shell_override: Option<&str>,
        python_override: Option<&str>,
    ) -> Self {
        Self {
            root,
            tab_width: file.tab_width,
            show_hidden: file.show_hidden,
            shell: shell_override
                .map(str::to_string)
                .unwrap_or_else(|| file.shell.clone()),
            python: python_override
                .map(str::to_string)
                .unwrap_or_else(|| file.python.clone()),
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slate")
        .join("config.toml")
}

fn dirs_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config on Linux/macOS
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

// ── Default config template written on first run ──────────────────────────────

const DEFAULT_CONFIG_TOML: &str = r#"# Slate configuration
# Run `slate --init` to regenerate this file.

# Spaces inserted per Tab keypress in the editor
tab_width = 4

# Show dotfiles in the explorer and quick-open palette
show_hidden = false

# Shell used for terminal and Run commands (`<shell> -c <command>`)
shell = "sh"

# Python interpreter used by the code metrics / import lens / bytecode tools
python = "python3"
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let file: ConfigFile = toml::from_str("tab_width = 2").unwrap();
        assert_eq!(file.tab_width, 2);
        assert_eq!(file.shell, "sh");
        assert_eq!(file.python, "python3");
        assert!(!file.show_hidden);
    }

    #[test]
    fn cli_overrides_win() {
        let file = ConfigFile::default();
        let resolved =
            ResolvedConfig::resolve(&file, PathBuf::from("/tmp"), Some("bash"), None);
        assert_eq!(resolved.shell, "bash");
        assert_eq!(resolved.python, "python3");
    }

    #[test]
    fn default_template_parses() {
        let file: ConfigFile = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(file.tab_width, 4);
    }
}
