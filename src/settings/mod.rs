use crate::common::net::parse_server_url;
use crate::config::{GlobalConfig, PlanPreset};
use crate::data_model::settings::{AppSettings, OutputMode};
use clap::Parser;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "speedgauge")]
#[command(about = "Internet speed test with ratings and an overall score", long_about = None)]
pub struct CliArgs {
    /// Speed test server base URL
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Measurement plan: standard|compact|quick
    #[arg(short, long)]
    plan: Option<String>,

    /// UI refresh rate (Hz)
    #[arg(long, default_value_t = 10)]
    refresh_hz: u16,

    /// Print progress and a text report instead of the TUI
    #[arg(long, conflicts_with = "json")]
    plain: bool,

    /// Print a JSON report instead of the TUI
    #[arg(long)]
    json: bool,

    /// Replay a scripted run instead of measuring the network
    #[arg(long)]
    simulate: bool,

    /// Do not append the result to history
    #[arg(long)]
    no_save: bool,

    /// Print saved history and exit
    #[arg(long)]
    history: bool,

    /// Log level filter, e.g. info or speedgauge=debug
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("ui refresh rate must be greater than zero (got {value})")]
    InvalidRefreshHz { value: u16 },
    #[error("invalid server URL: {value}")]
    InvalidServerUrl { value: String },
    #[error("unknown plan '{value}' (expected standard, compact or quick)")]
    UnknownPlan { value: String },
}

pub fn load_from_cli() -> Result<AppSettings, SettingsError> {
    let args = CliArgs::parse();
    from_args(args)
}

pub fn from_args(args: CliArgs) -> Result<AppSettings, SettingsError> {
    if args.refresh_hz == 0 {
        return Err(SettingsError::InvalidRefreshHz {
            value: args.refresh_hz,
        });
    }

    let server = args
        .server
        .map(|value| parse_server_url(&value).ok_or(SettingsError::InvalidServerUrl { value }))
        .transpose()?;
    let plan = args
        .plan
        .map(|value| PlanPreset::parse_cli(&value).ok_or(SettingsError::UnknownPlan { value }))
        .transpose()?;

    let output = if args.json {
        OutputMode::Json
    } else if args.plain {
        OutputMode::Plain
    } else {
        OutputMode::Tui
    };

    Ok(AppSettings {
        server,
        plan,
        refresh_hz: args.refresh_hz,
        output,
        simulate: args.simulate,
        save_history: !args.no_save,
        show_history: args.history,
        log_level: args.log_level,
    })
}

pub fn apply_global(settings: &AppSettings, global: &mut GlobalConfig) {
    global.ui_refresh_hz = settings.refresh_hz;
    if let Some(server) = &settings.server {
        global.server = server.clone();
    }
    if let Some(plan) = settings.plan {
        global.plan = plan;
    }
    if let Some(level) = &settings.log_level {
        global.log_level = level.clone();
    }
}
