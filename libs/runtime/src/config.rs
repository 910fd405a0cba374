use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths::home_dir::resolve_home_dir;

/// Server configuration file.
///
/// `server`, `logging` and `ingress` are typed; everything under `modules`
/// is kept as raw JSON until the owning module asks for it through
/// [`AppConfig::module_config`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` means "use [`default_logging_config`]".
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub ingress: IngressConfig,
    /// Directory of `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute after loading. Relative log paths resolve against it.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request handler timeout; 0 disables it.
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".into(),
            port: 8087,
            timeout_sec: default_timeout_sec(),
        }
    }
}

fn default_timeout_sec() -> u64 {
    30
}

/// Middleware knobs for the HTTP ingress.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngressConfig {
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            cors_enabled: false,
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_body_limit_bytes() -> usize {
    64 * 1024
}

/// Subsystem name to log section. `default` receives every target that no
/// other section claims; other keys match tracing targets by prefix.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// trace | debug | info | warn | error | off
    pub console_level: String,
    /// Empty disables the file sink.
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    /// Rotated files kept besides the live one.
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

pub fn default_logging_config() -> LoggingConfig {
    let section = Section {
        console_level: "info".into(),
        file: "logs/or-journey.log".into(),
        file_level: "debug".into(),
        max_backups: Some(3),
        max_size_mb: Some(100),
    };
    HashMap::from([("default".to_string(), section)])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: Some(default_logging_config()),
            ingress: IngressConfig::default(),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file, then `APP__*` environment variables
    /// (`APP__SERVER__PORT=9000` sets `server.port`).
    ///
    /// Optional sections start out empty so they stay `None` unless the file
    /// or the environment provides them.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        let config: AppConfig = Figment::from(Serialized::defaults(base))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed("APP__").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

        config.finish()
    }

    /// `load_layered` when a path is given, built-in defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Self::default().finish(),
        }
    }

    /// Resolve (and create) `server.home_dir`, then fold in `modules_dir`.
    fn finish(mut self) -> Result<Self> {
        self.server
            .resolve_home_dir()
            .context("Failed to resolve server.home_dir")?;
        if let Some(dir) = self.modules_dir.clone() {
            merge_module_files(&mut self.modules, dir)?;
        }
        Ok(self)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `--port` replaces `server.port`; `-v`/`-vv` raise the default console level.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let level = match args.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let (Some(level), Some(section)) = (level, logging.get_mut("default")) {
            section.console_level = level.to_string();
        }
    }

    /// Typed view of one entry of the `modules` bag. A missing entry yields
    /// `T::default()`; a present but malformed one is an error.
    pub fn module_config<T>(&self, name: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match self.modules.get(name) {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{name}'")),
        }
    }

    /// Set a single key inside a module's config entry, creating the entry if needed.
    pub fn set_module_value(
        &mut self,
        module: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let entry = self
            .modules
            .entry(module.to_string())
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        if entry.is_null() {
            *entry = serde_json::Value::Object(Default::default());
        }
        let obj = entry
            .as_object_mut()
            .with_context(|| format!("Configuration for module '{module}' is not a mapping"))?;
        obj.insert(key.to_string(), value);
        Ok(())
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
}

/// Home directory name under the platform home when `server.home_dir` is empty.
const DEFAULT_HOME_SUBDIR: &str = ".or-journey";

impl ServerConfig {
    /// Replace `home_dir` with its absolute form, creating the directory.
    /// An empty value selects `$HOME/.or-journey` (`%APPDATA%` on Windows).
    fn resolve_home_dir(&mut self) -> Result<()> {
        let requested = Some(self.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let resolved: PathBuf = resolve_home_dir(requested, DEFAULT_HOME_SUBDIR, true)?;
        self.home_dir = resolved.to_string_lossy().into_owned();
        Ok(())
    }
}

/// Every `*.yaml`/`*.yml` file in `dir` becomes `modules[<file stem>]`,
/// replacing an inline entry of the same name.
fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read modules_dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_yaml {
            continue;
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config '{}'", path.display()))?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in '{}'", path.display()))?;
        bag.insert(name.to_string(), serde_json::to_value(val)?);
    }
    Ok(())
}
