use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub nvim: Option<PathBuf>,
    pub clean: bool,
    pub timeout_ms: Option<u64>,
    pub quit_key: Option<String>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            nvim: other.nvim.clone().or_else(|| self.nvim.clone()),
            clean: self.clean || other.clean,
            timeout_ms: other.timeout_ms.or(self.timeout_ms),
            quit_key: other.quit_key.clone().or_else(|| self.quit_key.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("embedit").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("embedit")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("embedit").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("embedit").join("config");
        }
    }

    PathBuf::from(".embeditrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".embeditrc")
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
    lines.push("# embedit defaults (saved with --save)".to_string());
    if let Some(nvim) = &flags.nvim {
        lines.push(format!("--nvim {}", nvim.display()));
    }
    if flags.clean {
        lines.push("--clean".to_string());
    }
    if let Some(timeout_ms) = flags.timeout_ms {
        lines.push(format!("--timeout-ms {timeout_ms}"));
    }
    if let Some(key) = &flags.quit_key {
        lines.push(format!("--quit-key {key}"));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
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
        if token == "--clean" {
            flags.clean = true;
        } else if let Some((name, value)) = token.split_once('=') {
            apply_valued(&mut flags, name, value);
        } else if is_valued(token) {
            if let Some(next) = tokens.get(i + 1) {
                apply_valued(&mut flags, token, next);
                i += 1;
            }
        }
        i += 1;
    }
    flags
}

fn is_valued(token: &str) -> bool {
    matches!(
        token,
        "--nvim" | "--timeout-ms" | "--quit-key" | "--debug-log"
    )
}

fn apply_valued(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--nvim" => flags.nvim = Some(PathBuf::from(value)),
        "--timeout-ms" => flags.timeout_ms = value.parse().ok().or(flags.timeout_ms),
        "--quit-key" => flags.quit_key = Some(value.to_string()),
        "--debug-log" => flags.debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "embedit".to_string(),
            "--nvim".to_string(),
            "/opt/nvim/bin/nvim".to_string(),
            "--clean".to_string(),
            "--timeout-ms=500".to_string(),
            "--quit-key".to_string(),
            "ctrl-q".to_string(),
            "--debug-log=debug.log".to_string(),
            "notes.txt".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.nvim, Some(PathBuf::from("/opt/nvim/bin/nvim")));
        assert!(flags.clean);
        assert_eq!(flags.timeout_ms, Some(500));
        assert_eq!(flags.quit_key.as_deref(), Some("ctrl-q"));
        assert_eq!(flags.debug_log, Some(PathBuf::from("debug.log")));
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let args = vec!["--timeout-ms".to_string(), "soon".to_string()];
        assert_eq!(parse_flag_tokens(&args).timeout_ms, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            clean: true,
            timeout_ms: Some(1000),
            quit_key: Some("f10".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            timeout_ms: Some(250),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.clean);
        assert_eq!(merged.timeout_ms, Some(250));
        assert_eq!(merged.quit_key.as_deref(), Some("f10"));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".embeditrc");
        let flags = ConfigFlags {
            nvim: Some(PathBuf::from("/usr/local/bin/nvim")),
            clean: true,
            timeout_ms: Some(750),
            quit_key: Some("ctrl-q".to_string()),
            debug_log: Some(PathBuf::from("debug.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}
