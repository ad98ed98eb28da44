use std::{io::Write, sync::Arc};

use chrono::Datelike;
use chrono_tz::Tz;
use mini_app::{
    EditTransactionPage, HeadlessHost, LaunchParams, PageContext, SettingsPage,
    TransactionDetailPage, render,
};

use crate::{
    error::{AppError, Result},
    settings::Page,
};

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, page) = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finance_miniapp={level},mini_app={level}",
            level = settings.level
        ))
        .init();

    let timezone: Tz = settings
        .timezone
        .parse()
        .map_err(|_| AppError::Timezone(settings.timezone.clone()))?;

    let host = Arc::new(HeadlessHost::new());
    let mut ctx = PageContext::new(host.clone(), &settings.api_base_url)
        .with_timezone(timezone)
        .with_currency_symbol(&settings.currency_symbol);
    if let Some(key) = &settings.api_key {
        ctx = ctx.with_api_key(key);
    }

    let (title, body) = match page {
        Page::Edit { launch_url } => {
            let launch = LaunchParams::from_url(&launch_url)?;
            let page = EditTransactionPage::open(ctx, &launch).await?;
            ("Edit Transaction", page.render())
        }
        Page::Detail { launch_url } => {
            let launch = LaunchParams::from_url(&launch_url)?;
            let page = TransactionDetailPage::open(ctx, &launch).await?;
            ("Transaction Details", page.render())
        }
        Page::Settings { month } => {
            let (year, month) = match month {
                Some(month) => parse_month(&month)?,
                None => {
                    let today = chrono::Utc::now().with_timezone(&timezone);
                    (today.year(), today.month())
                }
            };
            let page = SettingsPage::open_at(ctx, year, month).await?;
            ("Settings", page.render())
        }
    };

    for event in host.events() {
        tracing::debug!("host event: {event:?}");
    }

    let document = render::document(title, body);
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", document.into_string())?;
    Ok(())
}

fn parse_month(value: &str) -> Result<(i32, u32)> {
    value
        .split_once('-')
        .and_then(|(year, month)| Some((year.parse().ok()?, month.parse().ok()?)))
        .filter(|(_, month)| (1..=12).contains(month))
        .ok_or_else(|| AppError::Month(value.to_string()))
}
