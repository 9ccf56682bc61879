use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILTER_ENV: &str = "BRANCHER_LOG";
const DEFAULT_LOG_FILTER: &str = "debug";

static HOOK_ONCE: Once = Once::new();
static LOG_PATH: OnceLock<Mutex<Option<PathBuf>>> = OnceLock::new();

fn log_path_state() -> &'static Mutex<Option<PathBuf>> {
    LOG_PATH.get_or_init(|| Mutex::new(None))
}

/// Keeps the log writer alive; dropping it flushes pending lines.
pub struct DiagnosticsSession {
    path: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self {
                path: None,
                _guard: None,
            });
        }

        let path = create_diagnostics_log_path()?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;
        write_header(&mut file, &path)?;

        let (writer, guard) = tracing_appender::non_blocking(file);
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
            .try_init()
            .map_err(|error| anyhow!("failed to install diagnostics logger: {error}"))?;

        *log_path_state()
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(path.clone());
        tracing::info!(path = %path.display(), "diagnostics enabled");

        Ok(Self {
            path: Some(path),
            _guard: Some(guard),
        })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

fn write_header(file: &mut File, path: &Path) -> Result<()> {
    let started = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format diagnostics start time")?;
    writeln!(
        file,
        "brancher diagnostics start\nversion={}\nstarted_at={started}\npid={}\nargv={:?}",
        env!("CARGO_PKG_VERSION"),
        std::process::id(),
        std::env::args().collect::<Vec<String>>()
    )
    .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;
    file.flush()
        .with_context(|| format!("failed to flush diagnostics header to {}", path.display()))
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let payload = panic_payload(panic_info);
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let backtrace = Backtrace::force_capture();

            tracing::error!(
                panic.message = %payload,
                panic.location = %location,
                panic.backtrace = ?backtrace,
                "panic captured"
            );

            let path = log_path_state()
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone();

            eprintln!("Fatal internal error in brancher: {payload}");
            match path {
                Some(path) => eprintln!("Diagnostics written to {}", path.display()),
                None => eprintln!("Run `brancher --diagnostics` to capture a diagnostics log."),
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn create_diagnostics_log_path() -> Result<PathBuf> {
    let config_path = brancher_core::config::resolve_config_path()
        .context("failed to resolve brancher config path for diagnostics")?;
    let config_dir = config_path.parent().ok_or_else(|| {
        anyhow!(
            "failed to resolve diagnostics directory from config path {}",
            config_path.display()
        )
    })?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    Ok(diagnostics_dir.join(format!("{now}.log")))
}
