use crate::config::PlanPreset;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Tui,
    Plain,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub server: Option<Url>,
    pub plan: Option<PlanPreset>,
    pub refresh_hz: u16,
    pub output: OutputMode,
    pub simulate: bool,
    pub save_history: bool,
    pub show_history: bool,
    pub log_level: Option<String>,
}
