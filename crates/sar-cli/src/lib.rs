//! SAR CLI - Command line tools for mission planning.
//!
//! Binaries:
//! - plan_mission: plan a mission over an area file and print it as JSON
//! - sweep_preview: print the sweep over a generated rectangle as CSV

pub mod area_file;
pub mod report;

pub use area_file::AreaFile;
pub use report::MissionReport;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr, filtered by `RUST_LOG`; `binary` and `sar_cli` log at info by default.
pub fn init_tracing(binary: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("{binary}=info").parse()?)
                .add_directive("sar_cli=info".parse()?),
        )
        .try_init()?;
    Ok(())
}
