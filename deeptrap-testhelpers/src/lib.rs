//! Shared test setup for the deeptrap crates.
//!
//! Call [`setup`] at the start of a test, or import the attribute with
//! `use deeptrap_testhelpers::test;` so every `#[test]` does it for you.
//! Log output is filtered with the `DEEPTRAP_LOG` environment variable, which
//! takes a `tracing_subscriber` targets directive such as `deeptrap=debug`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use deeptrap_testhelpers_macros::test;

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "DEEPTRAP_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

fn log_filter() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::TRACE))
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    color_backtrace::BacktracePrinter::new()
        .verbosity(color_backtrace::Verbosity::Medium)
        .add_frame_filter(Box::new(|frames| {
            frames.retain(|frame| {
                frame.name.as_deref().is_none_or(|name| {
                    !(name.starts_with("test::")
                        || name.starts_with("std::panicking::")
                        || name.starts_with("core::panicking::")
                        || name.starts_with("core::ops::function::FnOnce::call_once"))
                })
            })
        }))
        .install(Box::new(termcolor::StandardStream::stderr(
            termcolor::ColorChoice::Auto,
        )));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .with(log_filter())
        .try_init()
        .ok();
});

/// Install the test tracing subscriber and panic printer.
///
/// Safe to call from every test: initialization happens exactly once per
/// process.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}
