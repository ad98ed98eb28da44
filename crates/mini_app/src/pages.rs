//! The mini app's pages.
//!
//! Each page owns its state explicitly: a fetched snapshot, a staged edit
//! over it and a commit controller. Handlers mutate that state and callers
//! re-render with `render()`.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::{
    api::{ApiClient, Auth},
    error::{MiniAppError, Result},
    host::{Host, MainButton},
    loading::Loading,
};

pub mod edit_transaction;
pub mod settings;
pub mod transaction_detail;

/// What every page needs from its environment.
#[derive(Clone)]
pub struct PageContext {
    pub host: Arc<dyn Host>,
    pub api_base_url: String,
    /// Static key for the settings endpoints.
    pub api_key: Option<String>,
    /// Zone timestamps are displayed in.
    pub timezone: Tz,
    /// Prefix for budget amounts.
    pub currency_symbol: String,
}

impl PageContext {
    pub fn new(host: Arc<dyn Host>, api_base_url: impl Into<String>) -> Self {
        Self {
            host,
            api_base_url: api_base_url.into(),
            api_key: None,
            timezone: chrono_tz::Asia::Kolkata,
            currency_symbol: "₹".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub(crate) fn client(&self, auth: Auth) -> Result<ApiClient> {
        let loading = Loading::new(self.host.clone());
        Ok(ApiClient::new(&self.api_base_url, auth, loading)?)
    }

    /// Reports an error the page cannot start after.
    pub(crate) fn fail_startup(&self, context: &str, err: MiniAppError) -> MiniAppError {
        let message = match &err {
            MiniAppError::MissingLaunchParam(_) => err.user_message(),
            other => format!("{context}: {}", other.user_message()),
        };
        tracing::error!("{message}");
        self.host.show_alert(&message);
        self.host.set_main_button(&MainButton::hidden());
        err
    }

    /// Reports a failed user action; page state is left as it was.
    pub(crate) fn report(&self, context: &str, err: &MiniAppError) {
        let message = match err {
            MiniAppError::Validation(_) | MiniAppError::SelfLink => err.user_message(),
            other => format!("{context}: {}", other.user_message()),
        };
        tracing::warn!("{message}");
        self.host.show_alert(&message);
    }
}
