use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Prefilled user id on the login screen (password is never stored).
    pub user_id: String,
    /// Path of the persisted client state (token, selected group, flags).
    pub state_path: String,
    pub log_file: String,
    pub log_level: String,
    /// Push token to register with the server after login. Registration is
    /// skipped entirely when unset.
    pub push_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            user_id: String::new(),
            state_path: "config/tui_state.json".to_string(),
            log_file: "config/tui.log".to_string(),
            log_level: "info".to_string(),
            push_token: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tally_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the prefilled user id.
    #[arg(long)]
    user_id: Option<String>,
    /// Override the local state file path.
    #[arg(long)]
    state_path: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = user_id;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }

    Ok(settings)
}
