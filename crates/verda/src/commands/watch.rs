//! Live greenhouse view: re-renders as push updates arrive.

use std::io::IsTerminal;

use owo_colors::OwoColorize;

use verda_core::{ChannelState, GreenhouseId, LiveMonitor};

use crate::cli::{GlobalOpts, OutputFormat, SensorsArgs};
use crate::error::CliError;
use crate::output;

use super::sensors::SensorRow;

pub async fn handle(args: &SensorsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::monitor_config(global, args.page.to_policy(), true)?;
    let monitor = LiveMonitor::new(config)?;

    monitor.start(GreenhouseId::new(args.greenhouse_id)).await?;

    let mut sensors = monitor.sensors();
    let mut channel = monitor.channel_state();

    redraw(&monitor, global);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = sensors.changed() => {
                if changed.is_none() {
                    break;
                }
                redraw(&monitor, global);
            }
            changed = channel.changed() => {
                if changed.is_err() {
                    break;
                }
                redraw(&monitor, global);
            }
        }
    }

    monitor.stop().await;
    Ok(())
}

fn redraw(monitor: &LiveMonitor, global: &GlobalOpts) {
    let view = monitor.current();

    // Structured formats stream one document per change, for piping.
    match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::print_output(&output::render_json_compact(&view), global.quiet);
            return;
        }
        OutputFormat::Yaml | OutputFormat::Plain | OutputFormat::Table => {}
    }

    let color = output::should_color(&global.color);

    // Repaint in place when attached to a terminal, append otherwise.
    if std::io::stdout().is_terminal() {
        print!("\x1b[2J\x1b[1;1H");
    }

    let name = view
        .greenhouse
        .as_ref()
        .map_or_else(|| "greenhouse".into(), |g| g.name.clone());
    let status = status_line(&view.channel, color);
    println!("{name} -- {status}");

    let rows: Vec<SensorRow> = view
        .sensors
        .iter()
        .map(|v| SensorRow::new(v, color))
        .collect();
    if rows.is_empty() {
        println!("No sensors on this page for this greenhouse.");
    } else {
        println!("{}", output::render_table(&rows));
    }
}

fn status_line(state: &ChannelState, color: bool) -> String {
    let text = format!("live: {state}");
    if !color {
        return text;
    }
    match state {
        ChannelState::Open => text.green().to_string(),
        ChannelState::Reconnecting { .. } | ChannelState::Connecting => {
            text.yellow().to_string()
        }
        ChannelState::Idle | ChannelState::Closed => text.dimmed().to_string(),
    }
}
