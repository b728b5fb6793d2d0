//! Clap derive structures for the `verda` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use verda_core::ViewPolicy;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// verda -- live greenhouse monitoring from the command line
#[derive(Debug, Parser)]
#[command(
    name = "verda",
    version,
    about = "Watch greenhouse sensors, cameras, and alerts from the terminal",
    long_about = "A CLI for greenhouse monitoring backends.\n\n\
        One-shot commands print a snapshot; `watch` keeps a live view\n\
        open, merging push updates into the sensor table as they arrive.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "VERDA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "VERDA_SERVER", global = true)]
    pub server: Option<String>,

    /// API token
    #[arg(long, env = "VERDA_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VERDA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VERDA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "VERDA_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Page selection ───────────────────────────────────────────────────

/// Which page's sensor set to show.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PageArg {
    /// Every sensor type
    All,
    /// Environment page: everything except water level and solar voltage
    Environment,
    /// Resources page: water level and solar voltage only
    Resources,
}

impl PageArg {
    pub fn to_policy(self) -> ViewPolicy {
        match self {
            Self::All => ViewPolicy::all(),
            Self::Environment => ViewPolicy::environment(),
            Self::Resources => ViewPolicy::resources(),
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List your greenhouses
    #[command(alias = "gh")]
    Greenhouses,

    /// Show a greenhouse's overview: actuator states and active alerts
    Overview(ScopeArgs),

    /// Show a greenhouse's sensors with latest readings and alert flags
    #[command(alias = "sens")]
    Sensors(SensorsArgs),

    /// List a greenhouse's cameras
    #[command(alias = "cams")]
    Cameras(ScopeArgs),

    /// Follow a greenhouse live, re-rendering as push updates arrive
    #[command(alias = "w")]
    Watch(SensorsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ScopeArgs {
    /// Greenhouse id
    pub greenhouse_id: i64,
}

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// Greenhouse id
    pub greenhouse_id: i64,

    /// Which page's sensor set to show
    #[arg(long, value_enum, default_value = "all")]
    pub page: PageArg,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
