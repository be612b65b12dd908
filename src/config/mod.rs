/// Configuration system for senti.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::SentiConfig::default()`]
/// 2. **User global config**: `~/.senti/config.toml`
/// 3. **Project local config**: `.senti.toml` in the current working directory
/// 4. **Environment variables**: `SENTI_*` overrides (highest precedence)
///
/// File layers are merged key by key before deserialization, so a project
/// file that only sets `web.addr` keeps the API key from the global file.
/// Malformed files are logged and skipped; loading never fails.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::SentiConfig;

use crate::history::store::default_history_path;

/// Top-level sections accepted by `config set`.
const SECTIONS: [&str; 4] = ["api", "history", "web", "logging"];

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration: defaults → global TOML → project
/// TOML → env vars.
pub fn load() -> SentiConfig {
    let mut config = load_files(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files (lowest precedence first) over the defaults.
pub fn load_files(paths: &[Option<PathBuf>]) -> SentiConfig {
    let mut merged = toml::Table::new();
    for path in paths.iter().flatten() {
        let Some(layer) = read_toml_table(path) else {
            continue;
        };
        if let Err(e) = toml::Value::Table(layer.clone()).try_into::<SentiConfig>() {
            tracing::warn!(path = %path.display(), error = %e, "skipping config file with invalid values");
            continue;
        }
        merge_tables(&mut merged, layer);
    }

    toml::Value::Table(merged)
        .try_into()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid configuration values, using defaults");
            SentiConfig::default()
        })
}

/// Read a TOML file as a raw table. Missing files are silently skipped.
fn read_toml_table(path: &Path) -> Option<toml::Table> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping malformed config file");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`; overlay keys win.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => match base.get_mut(&key) {
                Some(toml::Value::Table(base_table)) => merge_tables(base_table, overlay_table),
                _ => {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.senti/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".senti").join("config.toml"))
}

/// Path to the project local config: `.senti.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".senti.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Resolve where history is stored for this config.
pub fn history_path(config: &SentiConfig) -> Option<PathBuf> {
    match config.history.file.as_deref() {
        Some(file) if !file.trim().is_empty() => Some(PathBuf::from(file)),
        _ => default_history_path(),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SENTI_API_KEY`: API credential
/// - `SENTI_API_URL`: analysis endpoint
/// - `SENTI_HISTORY_FILE`: history file path
/// - `SENTI_WEB_ADDR`: dashboard bind address
/// - `SENTI_LOG`: tracing filter directive
/// - `SENTI_LOG_FORMAT`: `text` or `json`
fn apply_env_overrides(config: &mut SentiConfig) {
    if let Ok(val) = std::env::var("SENTI_API_KEY")
        && !val.trim().is_empty()
    {
        config.api.api_key = Some(val);
    }
    if let Ok(val) = std::env::var("SENTI_API_URL")
        && !val.is_empty()
    {
        config.api.url = val;
    }
    if let Ok(val) = std::env::var("SENTI_HISTORY_FILE")
        && !val.is_empty()
    {
        config.history.file = Some(val);
    }
    if let Ok(val) = std::env::var("SENTI_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Ok(val) = std::env::var("SENTI_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
    if let Ok(val) = std::env::var("SENTI_LOG_FORMAT")
        && let Some(format) = parse_log_format(&val)
    {
        config.logging.format = format;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_log_format(val: &str) -> Option<schema::LogFormat> {
    match val.to_ascii_lowercase().as_str() {
        "text" | "pretty" => Some(schema::LogFormat::Text),
        "json" => Some(schema::LogFormat::Json),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.senti/config.toml`.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write the annotated default config to `path`.
///
/// Returns an error if the file already exists and `force` is not set.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, SentiConfig::default_toml()).context("failed to write config file")?;
    Ok(())
}

/// Set a single dotted key (e.g. `api.api_key`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a single dotted key in the config file at `path`, creating the file
/// from defaults when it does not exist yet.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(SentiConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let _: SentiConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted `section.key` path.
///
/// The new value keeps the type of the existing one; unknown leaves are
/// stored as strings.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.split_once('.') else {
        anyhow::bail!("config key must be 'section.key', got '{key}'");
    };
    if !SECTIONS.contains(&section) || leaf.is_empty() || leaf.contains('.') {
        anyhow::bail!("unknown config key: '{key}'");
    }

    let root_table = root
        .as_table_mut()
        .context("config root is not a table")?;
    let table = root_table
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML, with the API key masked.
pub fn show_effective_config() -> Result<String> {
    let mut config = load();
    config.api.api_key = config.masked_api_key();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_files_without_files_returns_defaults() {
        let config = load_files(&[None, None]);
        assert_eq!(config, SentiConfig::default());
    }

    #[test]
    fn project_layer_keeps_global_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(dir.path(), "global.toml", "[api]\napi_key = \"k-123\"\n");
        let project = write(dir.path(), "project.toml", "[web]\naddr = \"0.0.0.0:8000\"\n");

        let config = load_files(&[Some(global), Some(project)]);
        assert_eq!(config.api.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.web.addr, "0.0.0.0:8000");
    }

    #[test]
    fn later_layer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(dir.path(), "global.toml", "[api]\nurl = \"http://a\"\n");
        let project = write(dir.path(), "project.toml", "[api]\nurl = \"http://b\"\n");

        let config = load_files(&[Some(global), Some(project)]);
        assert_eq!(config.api.url, "http://b");
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(dir.path(), "global.toml", "[api]\napi_key = \"k\"\n");
        let broken = write(dir.path(), "broken.toml", "[api\nurl = ");

        let config = load_files(&[Some(global), Some(broken)]);
        assert_eq!(config.api.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn invalid_project_value_keeps_global_layer() {
        let dir = tempfile::tempdir().unwrap();
        let global = write(dir.path(), "global.toml", "[api]\napi_key = \"k-123\"\n");
        let project = write(dir.path(), "project.toml", "[web]\nopen_browser = \"yes\"\n");

        let config = load_files(&[Some(global), Some(project)]);
        assert_eq!(config.api.api_key.as_deref(), Some("k-123"));
        assert!(config.web.open_browser);
    }

    #[test]
    fn merge_tables_is_recursive() {
        let mut base: toml::Table =
            toml::from_str("[web]\naddr = \"a\"\nopen_browser = false\n").unwrap();
        let overlay: toml::Table = toml::from_str("[web]\naddr = \"b\"\n").unwrap();
        merge_tables(&mut base, overlay);
        let web = base["web"].as_table().unwrap();
        assert_eq!(web["addr"].as_str(), Some("b"));
        assert_eq!(web["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn history_path_prefers_configured_file() {
        let mut config = SentiConfig::default();
        config.history.file = Some("/tmp/senti-history.json".to_string());
        assert_eq!(
            history_path(&config),
            Some(PathBuf::from("/tmp/senti-history.json"))
        );
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn parse_log_format_handles_variants() {
        assert_eq!(parse_log_format("json"), Some(schema::LogFormat::Json));
        assert_eq!(parse_log_format("TEXT"), Some(schema::LogFormat::Text));
        assert_eq!(parse_log_format("xml"), None);
    }

    #[test]
    fn set_toml_value_preserves_bool_type() {
        let mut root: toml::Value = toml::from_str("[web]\nopen_browser = true\n").unwrap();
        set_toml_value(&mut root, "web.open_browser", "off").unwrap();
        assert_eq!(root["web"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_creates_missing_section() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        set_toml_value(&mut root, "api.api_key", "secret").unwrap();
        assert_eq!(root["api"]["api_key"].as_str(), Some("secret"));
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "api", "v").is_err());
        assert!(set_toml_value(&mut root, "api.a.b", "v").is_err());
    }

    #[test]
    fn set_config_value_at_creates_file_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        set_config_value_at(&path, "api.api_key", "abc").unwrap();

        let config = load_files(&[Some(path)]);
        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.url, schema::DEFAULT_API_URL);
    }

    #[test]
    fn set_config_value_at_rejects_invalid_enum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(set_config_value_at(&path, "logging.format", "xml").is_err());
        // File untouched
        let config = load_files(&[Some(path)]);
        assert_eq!(config.logging.format, schema::LogFormat::Text);
    }

    #[test]
    fn init_config_at_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
    }
}
