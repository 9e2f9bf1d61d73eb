use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Html,
    Json,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub resolve: bool,
    pub toc: bool,
    pub pages: bool,
    pub format: Option<ExportFormat>,
    pub capacity: Option<u32>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            resolve: self.resolve || other.resolve,
            toc: self.toc || other.toc,
            pages: self.pages || other.pages,
            format: other.format.or(self.format),
            capacity: other.capacity.or(self.capacity),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("scenarist").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("scenarist")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("scenarist").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("scenarist")
                .join("config");
        }
    }

    PathBuf::from(".scenaristrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".scenaristrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# scenarist defaults (saved with --save)".to_string());
    if flags.resolve {
        lines.push("--resolve".to_string());
    }
    if flags.toc {
        lines.push("--toc".to_string());
    }
    if flags.pages {
        lines.push("--pages".to_string());
    }
    if let Some(format) = flags.format {
        let format_str = match format {
            ExportFormat::Text => "text",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        };
        lines.push(format!("--format {}", format_str));
    }
    if let Some(capacity) = flags.capacity {
        lines.push(format!("--capacity {}", capacity));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--resolve" {
            flags.resolve = true;
        } else if token == "--toc" {
            flags.toc = true;
        } else if token == "--pages" {
            flags.pages = true;
        } else if token == "--format" {
            if let Some(next) = tokens.get(i + 1) {
                flags.format = parse_format(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--format=") {
            flags.format = parse_format(value);
        } else if token == "--capacity" {
            if let Some(next) = tokens.get(i + 1) {
                flags.capacity = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--capacity=") {
            flags.capacity = value.parse().ok();
        }
        i += 1;
    }
    flags
}

fn parse_format(s: &str) -> Option<ExportFormat> {
    match s {
        "text" => Some(ExportFormat::Text),
        "html" => Some(ExportFormat::Html),
        "json" => Some(ExportFormat::Json),
        _ => None,
    }
}
