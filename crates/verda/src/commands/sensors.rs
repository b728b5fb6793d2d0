//! One-shot sensor snapshot with alert flags.

use owo_colors::OwoColorize;
use tabled::Tabled;

use verda_core::{GreenhouseId, LiveMonitor, SensorView};

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Alert")]
    alert: String,
}

impl SensorRow {
    pub(crate) fn new(view: &SensorView, color: bool) -> Self {
        Self {
            id: view.sensor.id.to_string(),
            name: view.sensor.display_name(),
            kind: view.sensor.kind.to_string(),
            reading: reading_cell(view, color),
            updated: view
                .sensor
                .latest_reading
                .map(|r| r.timestamp.to_rfc3339())
                .unwrap_or_default(),
            alert: if view.alert { "ALERT".into() } else { String::new() },
        }
    }
}

fn reading_cell(view: &SensorView, color: bool) -> String {
    let Some(reading) = view.sensor.latest_reading else {
        return "no data yet".into();
    };

    let unit = view.sensor.kind.unit();
    let text = if unit.is_empty() {
        reading.value.to_string()
    } else {
        format!("{} {unit}", reading.value)
    };

    if !color {
        return text;
    }
    if view.alert {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &SensorsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::monitor_config(global, args.page.to_policy(), false)?;
    let monitor = LiveMonitor::new(config)?;

    monitor.start(GreenhouseId::new(args.greenhouse_id)).await?;
    let view = monitor.current();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &view.sensors,
        |v| SensorRow::new(v, color),
        |v| v.sensor.id.to_string(),
    );
    output::print_output(&out, global.quiet);

    monitor.stop().await;
    Ok(())
}
