//! Logging bootstrap.
//!
//! Each key of the logging map names a target prefix (usually a crate such as
//! `or_journey` or `tower_http`); the `default` key covers every target not
//! named explicitly. Console output is human readable, file output is JSON
//! written through size-rotated files under `server.home_dir`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, Targets};
use tracing_subscriber::fmt::{self, MakeWriter};

use crate::config::{LoggingConfig, Section};

const DEFAULT_KEY: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target == prefix` or `target` lives in the `prefix::` namespace.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Relative log paths live under the home dir.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

// -------- rotating file writers --------

type SharedRotate = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct RotatingFile(SharedRotate);

impl RotatingFile {
    fn open(path: &Path, section: &Section) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
        let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

        let rotate = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(backups)),
            ContentLimit::BytesSurpassed(max_bytes as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rotate))))
    }
}

/// Writer handed to the fmt layer for a single event. `None` drops the record.
struct FileHandle(Option<SharedRotate>);

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.0 {
            Some(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.0 {
            Some(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file for a record by its target; unnamed targets go to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<SharedRotate> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map(|(_, f)| f.0.clone())
            .or_else(|| self.default.as_ref().map(|f| f.0.clone()))
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> MakeWriter<'a> for FileRouter {
    type Writer = FileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        FileHandle(self.default.as_ref().map(|f| f.0.clone()))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        FileHandle(self.route(meta.target()))
    }
}

// -------- plan --------

/// Filters and writers derived from a `LoggingConfig`, before installation.
struct LogPlan {
    /// Console levels for explicitly named subsystems.
    console_targets: Targets,
    /// File levels for explicitly named subsystems that have a file.
    file_targets: Targets,
    /// Catch-all levels from the `default` section.
    default_console: Option<Level>,
    default_file: Option<Level>,
    named: Vec<String>,
    files: FileRouter,
}

impl LogPlan {
    fn from_config(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
        let mut file_targets = Targets::new().with_default(LevelFilter::OFF);
        let mut files = FileRouter::default();
        let mut named = Vec::new();

        // Sorted so routing is stable regardless of map order
        let mut sections: Vec<(&String, &Section)> =
            cfg.iter().filter(|(k, _)| k.as_str() != DEFAULT_KEY).collect();
        sections.sort_by(|a, b| a.0.cmp(b.0));

        for (name, section) in sections {
            named.push(name.clone());
            if let Some(level) = parse_tracing_level(&section.console_level) {
                console_targets = console_targets.with_target(name.clone(), level);
            }
            if let Some(file) = open_section_file(name, section, base_dir) {
                if let Some(level) = parse_tracing_level(&section.file_level) {
                    file_targets = file_targets.with_target(name.clone(), level);
                }
                files.by_prefix.push((name.clone(), file));
            }
        }

        let default = cfg.get(DEFAULT_KEY);
        let default_console = default.and_then(|s| parse_tracing_level(&s.console_level));
        files.default = default.and_then(|s| open_section_file(DEFAULT_KEY, s, base_dir));
        let default_file = match (&files.default, default) {
            (Some(_), Some(s)) => parse_tracing_level(&s.file_level),
            _ => None,
        };

        Self {
            console_targets,
            file_targets,
            default_console,
            default_file,
            named,
            files,
        }
    }

    /// Everything at or below `max` whose target is not a named subsystem.
    fn catch_all(
        &self,
        max: Level,
    ) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static> {
        let named = self.named.clone();
        FilterFn::new(move |meta: &tracing::Metadata<'_>| {
            *meta.level() <= max
                && !named
                    .iter()
                    .any(|prefix| matches_target_prefix(meta.target(), prefix))
        })
    }

    fn install(self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

        let ansi = atty::is(atty::Stream::Stdout);
        let has_files = !self.files.is_empty();

        let console_named = fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(self.console_targets.clone());

        let console_default = self.default_console.map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(self.catch_all(level))
        });

        let file_named = has_files.then(|| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(self.files.clone())
                .with_filter(self.file_targets.clone())
        });

        let file_default = self.default_file.map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(self.files.clone())
                .with_filter(self.catch_all(level))
        });

        // A subscriber may already be installed (tests); keep the first one.
        let _ = Registry::default()
            .with(console_named)
            .with(console_default)
            .with(file_named)
            .with(file_default)
            .try_init();
    }
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_log_path(&section.file, base_dir);
    match RotatingFile::open(&path, section) {
        Ok(file) => Some(file),
        Err(e) => {
            // The subscriber is not up yet, so stderr is the only channel.
            eprintln!(
                "Failed to open log file for '{}' at {}: {}",
                name,
                path.display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

/// Install the global subscriber described by `cfg`.
///
/// `base_dir` anchors relative log file paths (normally `server.home_dir`).
/// An empty config installs a plain console subscriber at `info`.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records from dependencies before the subscriber goes in
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_max_level(Level::INFO)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    LogPlan::from_config(cfg, base_dir).install();
}
