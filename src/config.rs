use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;

use crate::tape::DEFAULT_TAPE_SIZE;

/// Engine settings read from `bf.toml`, before flag and env overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tape_size: usize,
    pub max_steps: Option<u64>,
    pub timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            max_steps: None,
            timeout_ms: None,
        }
    }
}

impl Settings {
    /// Resolve limits: flags -> env -> config file -> defaults.
    pub fn resolve(
        &self,
        size: Option<usize>,
        max_steps: Option<u64>,
        timeout_ms: Option<u64>,
    ) -> Settings {
        Settings {
            tape_size: size
                .or_else(|| env_parse("BF_TAPE_SIZE"))
                .unwrap_or(self.tape_size),
            max_steps: max_steps
                .or_else(|| env_parse("BF_MAX_STEPS"))
                .or(self.max_steps),
            timeout_ms: timeout_ms
                .or_else(|| env_parse("BF_TIMEOUT_MS"))
                .or(self.timeout_ms),
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<Settings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Some(parse_settings(&content))
}

/// Pull `[engine]` keys out of a `bf.toml` document.
///
/// Only `key = value` lines are understood; values may be quoted. Unknown
/// keys and unparsable values leave the default in place.
pub fn parse_settings(content: &str) -> Settings {
    let mut in_engine = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_engine = line[1..line.len() - 1].trim() == "engine";
            continue;
        }
        if !in_engine {
            continue;
        }
        if let Some((key, val_raw)) = line.split_once('=') {
            let val_raw = val_raw.trim();
            let val = val_raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val_raw);
            map.insert(key.trim().to_string(), val.trim().to_string());
        }
    }

    let mut cfg = Settings::default();

    macro_rules! set {
        ($field:ident, $key:literal) => {
            if let Some(v) = map.get($key).and_then(|s| s.parse().ok()) {
                cfg.$field = v;
            }
        };
        ($field:ident, $key:literal, optional) => {
            if let Some(v) = map.get($key).and_then(|s| s.parse().ok()) {
                cfg.$field = Some(v);
            }
        };
    }

    set!(tape_size, "tape_size");
    set!(max_steps, "max_steps", optional);
    set!(timeout_ms, "timeout_ms", optional);

    cfg
}
