mod handlers;
mod server;

use std::env;

use anyhow::Result;
use event_ics_core::{IcsOptions, Theme, TimePolicy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "event_ics_server=info,event_ics_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = load_options()?;
    tracing::info!(
        "Using time zone {} for event times",
        options.time_policy.zone
    );

    // 启动服务器
    server::start_server(AppState::new(options, Theme::default())).await
}

/// 从环境变量读取日历选项
fn load_options() -> Result<IcsOptions> {
    let mut options = IcsOptions::default();

    if let Some(zone) = non_empty_var("EVENT_ICS_TIMEZONE") {
        options.time_policy = TimePolicy::from_name(&zone)?;
    }
    options.calendar_name = non_empty_var("EVENT_ICS_CALENDAR_NAME");

    Ok(options)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
