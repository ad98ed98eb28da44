//! Markup shared by every page.
//!
//! Render functions are pure: they take view state and return [`Markup`],
//! so pages can be checked without a browser.

use api_types::category::IconDescriptor;
use base64::Engine;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use maud::{DOCTYPE, Markup, html};
use rust_decimal::Decimal;

/// Root the `img:` icon paths are relative to.
pub const ICON_ROOT: &str = "/static/images/icons/";
/// Glyph drawn when a subcategory has no icon.
pub const DEFAULT_GLYPH: &str = "circle";
/// Glyph drawn for icon values with no known prefix.
pub const FALLBACK_GLYPH: &str = "tag";

pub fn glyph(name: &str) -> Markup {
    html! { i data-feather=(name) {} }
}

pub fn icon(descriptor: Option<&IconDescriptor>) -> Markup {
    match descriptor {
        None => glyph(DEFAULT_GLYPH),
        Some(IconDescriptor::Glyph(name)) => glyph(name),
        Some(IconDescriptor::Image(path)) => html! {
            img src={ (ICON_ROOT) (path) } class="custom-icon" alt="icon";
        },
        Some(IconDescriptor::Emoji(emoji)) => html! {
            span class="emoji-icon" { (emoji) }
        },
        Some(IconDescriptor::RawSvg(svg)) => html! {
            img src=(svg_data_uri(svg)) class="custom-icon" alt="icon";
        },
        Some(IconDescriptor::Unrecognized(_)) => glyph(FALLBACK_GLYPH),
    }
}

/// Inline SVG as an image source, so markup from the API is never injected
/// into the document.
pub fn svg_data_uri(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::prelude::BASE64_STANDARD.encode(svg)
    )
}

/// An inherit/true/false override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Inherit,
    ForceTrue,
    ForceFalse,
}

impl TriState {
    pub const ALL: [TriState; 3] = [Self::Inherit, Self::ForceTrue, Self::ForceFalse];

    pub fn active_index(self) -> usize {
        match self {
            Self::Inherit => 0,
            Self::ForceTrue => 1,
            Self::ForceFalse => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn value(self) -> &'static str {
        match self {
            Self::Inherit => "inherit",
            Self::ForceTrue => "true",
            Self::ForceFalse => "false",
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Inherit,
            Some(true) => Self::ForceTrue,
            Some(false) => Self::ForceFalse,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Inherit => None,
            TriState::ForceTrue => Some(true),
            TriState::ForceFalse => Some(false),
        }
    }
}

/// One option of a segmented toggle.
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    pub value: &'a str,
    pub label: &'a str,
}

/// Mutually exclusive segments with exactly one active.
///
/// `key` names the toggle (`data-toggle`); the active position is exposed as
/// `data-active-index` and drives the slider offset.
pub fn segmented_toggle(key: &str, segments: &[Segment<'_>], active: usize) -> Markup {
    let slider = format!("--active-index: {active}");
    html! {
        div class="three-state-toggle" data-toggle=(key) data-active-index=(active) style=(slider) {
            @for (index, segment) in segments.iter().enumerate() {
                button
                    type="button"
                    class=(if index == active { "toggle-segment active-text" } else { "toggle-segment" })
                    data-value=(segment.value)
                    data-index=(index)
                    aria-pressed=(if index == active { "true" } else { "false" })
                {
                    (segment.label)
                }
            }
        }
    }
}

pub fn tri_state_toggle(key: &str, labels: [&str; 3], state: TriState) -> Markup {
    let segments: Vec<Segment<'_>> = TriState::ALL
        .iter()
        .zip(labels)
        .map(|(state, label)| Segment {
            value: state.value(),
            label,
        })
        .collect();
    segmented_toggle(key, &segments, state.active_index())
}

pub fn switch(key: &str, label: &str, checked: bool) -> Markup {
    html! {
        div class="subcategory-toggle-item" {
            span class="subcategory-toggle-label" { (label) }
            label class="switch" {
                input type="checkbox" class="subcategory-flag-toggle" data-flag=(key) checked[checked];
                span class="slider" {}
            }
        }
    }
}

pub fn format_amount(amount: Option<Decimal>, currency: Option<&str>) -> String {
    let amount = amount.unwrap_or_default();
    match currency {
        Some(currency) => format!("{amount:.2} {currency}"),
        None => format!("{amount:.2}"),
    }
}

pub fn format_timestamp(at: Option<&DateTime<FixedOffset>>, tz: Tz) -> String {
    at.map(|at| at.with_timezone(&tz).format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

/// Shortened hash for display.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..10).unwrap_or(hash)
}

/// Full document around a page body, for previews.
pub fn document(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src="https://telegram.org/js/telegram-web-app.js" {}
                script src="https://unpkg.com/feather-icons" {}
            }
            body { (body) }
        }
    }
}
