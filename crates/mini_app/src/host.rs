//! The host runtime a page is embedded in.
//!
//! The chat client owns the chrome: the primary action button, modal alerts,
//! theming and the session itself. Pages only talk to it through [`Host`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::loading::LoadingIndicator;

/// State of the host's primary action button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainButton {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
    pub in_progress: bool,
}

impl MainButton {
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            visible: false,
            enabled: false,
            in_progress: false,
        }
    }

    pub fn labelled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            enabled: true,
            in_progress: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn in_progress(mut self, in_progress: bool) -> Self {
        self.in_progress = in_progress;
        self
    }
}

pub trait Host: LoadingIndicator {
    /// Expands the session to full height and applies the host theme.
    fn expand(&self) {}

    fn set_main_button(&self, button: &MainButton);

    /// Modal alert. Blocks nothing on our side; the user dismisses it.
    fn show_alert(&self, message: &str);

    /// Ends the session.
    fn close(&self);
}

/// Something the host was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Expanded,
    Loading(bool),
    MainButton(MainButton),
    Alert(String),
    Closed,
}

/// A host with no UI that records every request.
///
/// Used to drive pages outside a chat client.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    events: Mutex<Vec<HostEvent>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn events_mut(&self) -> MutexGuard<'_, Vec<HostEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events_mut().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events_mut()
            .iter()
            .filter_map(|event| match event {
                HostEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.events_mut()
            .iter()
            .any(|event| matches!(event, HostEvent::Closed))
    }

    /// Last state pushed to the main button.
    pub fn main_button(&self) -> Option<MainButton> {
        self.events_mut().iter().rev().find_map(|event| match event {
            HostEvent::MainButton(button) => Some(button.clone()),
            _ => None,
        })
    }

    /// Whether the loading overlay is currently shown.
    pub fn is_loading(&self) -> bool {
        self.events_mut()
            .iter()
            .rev()
            .find_map(|event| match event {
                HostEvent::Loading(visible) => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl LoadingIndicator for HeadlessHost {
    fn set_loading(&self, visible: bool) {
        self.events_mut().push(HostEvent::Loading(visible));
    }
}

impl Host for HeadlessHost {
    fn expand(&self) {
        self.events_mut().push(HostEvent::Expanded);
    }

    fn set_main_button(&self, button: &MainButton) {
        self.events_mut().push(HostEvent::MainButton(button.clone()));
    }

    fn show_alert(&self, message: &str) {
        tracing::info!("alert: {message}");
        self.events_mut().push(HostEvent::Alert(message.to_string()));
    }

    fn close(&self) {
        self.events_mut().push(HostEvent::Closed);
    }
}
