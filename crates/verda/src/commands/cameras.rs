//! Camera listing.

use tabled::Tabled;

use verda_core::{Camera, GreenhouseId, LiveMonitor, ViewPolicy};

use crate::cli::{GlobalOpts, ScopeArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Camera> for CameraRow {
    fn from(c: &Camera) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.display_name(),
            description: c.description.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &ScopeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::monitor_config(global, ViewPolicy::all(), false)?;
    let monitor = LiveMonitor::new(config)?;

    let cameras = monitor
        .list_cameras(GreenhouseId::new(args.greenhouse_id))
        .await?;

    let out = output::render_list(&global.output, &cameras, |c| CameraRow::from(c), |c| {
        c.id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
