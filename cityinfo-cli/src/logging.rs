//! Log subscriber installed by the `cityinfo` binary.
//!
//! Records go to stderr and, unless disabled, to a daily rolling file under
//! `log/` (override with `CITYINFO_LOG_DIR`, or set it empty to disable the
//! file). Both outputs honour `RUST_LOG` and default to `info`.

use camino::Utf8Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Directory for the rolling log file when none is configured.
pub const DEFAULT_LOG_DIRECTORY: &str = "log";
/// Environment variable overriding [`DEFAULT_LOG_DIRECTORY`].
pub const ENV_LOG_DIRECTORY: &str = "CITYINFO_LOG_DIR";

const LOG_FILE_PREFIX: &str = "cityinfo";
const LOG_FILE_SUFFIX: &str = "txt";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Daily rolling appender writing `cityinfo.<date>.txt` into `directory`.
///
/// # Errors
/// Returns [`InitError`] when the directory or file cannot be created.
pub fn file_appender(directory: &Utf8Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(directory.as_std_path())
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live until
/// the process exits.
pub fn init() -> Option<WorkerGuard> {
    let directory = std::env::var(ENV_LOG_DIRECTORY)
        .unwrap_or_else(|_| DEFAULT_LOG_DIRECTORY.to_owned());
    let appender = if directory.is_empty() {
        None
    } else {
        match file_appender(Utf8Path::new(&directory)) {
            Ok(appender) => Some(appender),
            Err(err) => {
                eprintln!("cityinfo: file logging disabled: {err}");
                None
            }
        }
    };
    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter()),
        )
        .with(file_layer)
        .init();
    guard
}
