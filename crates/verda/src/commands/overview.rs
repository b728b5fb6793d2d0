//! Greenhouse overview: actuator states and active alerts.

use owo_colors::OwoColorize;
use tabled::Tabled;

use verda_core::{Actuator, GreenhouseId, LiveMonitor, Overview, ViewPolicy};

use crate::cli::{GlobalOpts, ScopeArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ActuatorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Since")]
    since: String,
}

impl From<&Actuator> for ActuatorRow {
    fn from(a: &Actuator) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.display_name(),
            kind: a.actuator_type.clone(),
            status: a
                .latest_status
                .as_ref()
                .map_or_else(|| "no status yet".into(), |s| s.value.clone()),
            since: a
                .latest_status
                .as_ref()
                .map(|s| s.timestamp.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &ScopeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::monitor_config(global, ViewPolicy::all(), false)?;
    let monitor = LiveMonitor::new(config)?;

    let overview = monitor
        .fetch_overview(GreenhouseId::new(args.greenhouse_id))
        .await?;

    let out = output::render_single(&global.output, &overview, render_detail(global), |o| {
        o.name.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_detail(global: &GlobalOpts) -> impl Fn(&Overview) -> String + '_ {
    let color = output::should_color(&global.color);
    move |overview| {
        let mut out = String::new();

        out.push_str(&format!("Greenhouse: {}\n", overview.name));
        if let Some(ref location) = overview.location {
            out.push_str(&format!("Location:   {location}\n"));
        }
        out.push('\n');

        if overview.actuators.is_empty() {
            out.push_str("No actuators found for this greenhouse.\n");
        } else {
            let rows: Vec<ActuatorRow> = overview.actuators.iter().map(ActuatorRow::from).collect();
            out.push_str(&output::render_table(&rows));
            out.push('\n');
        }

        if !overview.alerts.is_empty() {
            out.push('\n');
            let heading = "Active alerts:";
            if color {
                out.push_str(&format!("{}\n", heading.red().bold()));
            } else {
                out.push_str(&format!("{heading}\n"));
            }
            for alert in &overview.alerts {
                if color {
                    out.push_str(&format!("  ! {}\n", alert.red()));
                } else {
                    out.push_str(&format!("  ! {alert}\n"));
                }
            }
        }

        out.trim_end().to_owned()
    }
}
