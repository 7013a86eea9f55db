//! Small persistent key-value store for client preferences.
//!
//! The file format is the one used by the other config files: `key = value`
//! lines, `#` comments and blank lines ignored, unknown keys kept as-is.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Read/write access to persisted client settings.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()>;
}

/// Settings persisted to a `key = value` file, rewritten on every `set`.
#[derive(Clone, Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettings {
    /// Load `path`; a missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => parse(&contents),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "settings: starting empty");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn write_file(&self) -> std::io::Result<()> {
        use std::fmt::Write as _;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut buf = String::from("# userdesk settings\n");
        for (k, v) in &self.values {
            let _ = writeln!(&mut buf, "{k} = {v}");
        }
        std::fs::write(&self.path, buf)
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.write_file().inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "settings: write failed");
        })
    }
}

fn parse(contents: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, '=');
        let key = parts.next().map(|s| s.trim()).unwrap_or("");
        let val = parts.next().map(|s| s.trim()).unwrap_or("");
        if key.is_empty() || val.is_empty() {
            continue;
        }
        values.insert(key.to_string(), val.to_string());
    }
    values
}

/// In-memory store, for tests and for running without a writable config dir.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut s = Self::default();
        s.values.insert(key.to_string(), value.to_string());
        s
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
