//! Greenhouse directory listing.

use tabled::Tabled;

use verda_core::{GreenhouseSummary, LiveMonitor, ViewPolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GreenhouseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&GreenhouseSummary> for GreenhouseRow {
    fn from(g: &GreenhouseSummary) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            location: g.location.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::monitor_config(global, ViewPolicy::all(), false)?;
    let monitor = LiveMonitor::new(config)?;

    let greenhouses = monitor.list_greenhouses().await?;

    let out = output::render_list(
        &global.output,
        &greenhouses,
        |g| GreenhouseRow::from(g),
        |g| g.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
