use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the tracing subscriber for an application embedding the
/// engine. `RUST_LOG` controls filtering (default "info"); when
/// `VM_LOG_DIR` is set, output goes to `<VM_LOG_DIR>/<app>.log` with
/// daily rotation, otherwise to stdout. Calling this more than once is a
/// no-op.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match rotating_writer(app_name) {
        Some(writer) => {
            let _ = builder.with_writer(writer).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

fn rotating_writer(app_name: &'static str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os("VM_LOG_DIR")?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %err, "failed to create VM_LOG_DIR; logging to stdout");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Keep the guard for the process lifetime so buffered lines flush.
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

/// Route panics through `tracing` so they land in the same sink as the
/// rest of the logs. Installed once per process; set
/// `VM_LOG_INCLUDE_BACKTRACE=1` to chain into the default hook as well.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let chain_default = std::env::var("VM_LOG_INCLUDE_BACKTRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));

            tracing::error!(
                application = app_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if chain_default {
                default_hook(info);
            }
        }));
    });
}
