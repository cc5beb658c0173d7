//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize tracing for the host application or a test run. Safe to call multiple times.
///
/// Output goes to stderr so it never mixes with what the host writes to stdout.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact();

        // Another subscriber may already be installed by the host; keep it.
        let installed = if is_test {
            builder.with_test_writer().finish().try_init()
        } else {
            builder.with_writer(std::io::stderr).finish().try_init()
        };
        if let Err(e) = installed {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
