use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Installs a timestamp-free subscriber filtered by `RUST_LOG`, `info` by
/// default. `log` records from the library are bridged into it.
pub fn init_logger() {
    struct NoTime;
    impl FormatTime for NoTime {
        fn format_time(&self, _: &mut format::Writer<'_>) -> std::fmt::Result {
            Ok(())
        }
    }

    let format = format()
        .with_timer(NoTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format).with_filter(filter))
        .init();
}
