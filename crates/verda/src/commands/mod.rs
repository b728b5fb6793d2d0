//! Command handlers, one module per noun.

pub mod cameras;
pub mod greenhouses;
pub mod overview;
pub mod sensors;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Greenhouses => greenhouses::handle(global).await,
        Command::Overview(args) => overview::handle(&args, global).await,
        Command::Sensors(args) => sensors::handle(&args, global).await,
        Command::Cameras(args) => cameras::handle(&args, global).await,
        Command::Watch(args) => watch::handle(&args, global).await,
        // Handled in main before dispatch
        Command::Completions(_) => Ok(()),
    }
}
