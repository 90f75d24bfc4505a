use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub endpoint_template: Option<String>,
    #[serde(alias = "kind")]
    pub record_kind: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub page_size: Option<usize>,
    #[serde(alias = "sort_key")]
    pub sort: Option<String>,
    #[serde(alias = "sort_order")]
    pub order: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub show_stats: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".caseview").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    // an all-comment file parses as YAML null
    if contents.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#')
    }) {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# caseview config
#
# Location (default):
#   ~/.caseview/config.yml

# Registry API used by --entity (KIND:ID)
# api_base: https://registry.example.com/api
# endpoint_template: "{base}/{entity}/{id}/{records}/"

# Record kind: case or gazette
record_kind: case

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080

# Query defaults
page_size: 10
sort: date
order: desc

# Output (optional)
# output: ./cases.html
# output_format: text
show_stats: false
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_with_expected_values() {
        let cfg = parse_config(&default_config_yaml(), Path::new("default")).unwrap();
        assert_eq!(cfg.record_kind.as_deref(), Some("case"));
        assert_eq!(cfg.page_size, Some(10));
        assert_eq!(cfg.sort.as_deref(), Some("date"));
        assert_eq!(cfg.order.as_deref(), Some("desc"));
        assert_eq!(cfg.api_base, None);
    }

    #[test]
    fn comment_only_file_is_empty_config() {
        let cfg = parse_config("# nothing here\n\n", Path::new("x")).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn aliases_are_accepted() {
        let cfg = parse_config("kind: gazette\nsort_key: title\n", Path::new("x")).unwrap();
        assert_eq!(cfg.record_kind.as_deref(), Some("gazette"));
        assert_eq!(cfg.sort.as_deref(), Some("title"));
    }

    #[test]
    fn missing_file_handling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).unwrap_err().contains("not found"));
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.timeout, Some(10));
    }

    #[test]
    fn bad_yaml_reports_path() {
        let err = parse_config("page_size: [1, 2", Path::new("/tmp/cfg.yml")).unwrap_err();
        assert!(err.contains("/tmp/cfg.yml"));
    }
}
