//! Icon selection mini-form of the create-subcategory dialog.
//!
//! Three tabs feed one [`IconSelection`]: a searchable Feather grid, emoji
//! grids plus a free-form emoji input, and an SVG upload.

use api_types::category::{IconDescriptor, IconKind, is_svg_markup};
use base64::Engine;
use maud::{Markup, html};

use crate::{
    error::{MiniAppError, Result},
    render,
};

pub const MAX_SVG_BYTES: usize = 100 * 1024;
const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";
const MAX_EMOJI_UTF16_LEN: usize = 10;

/// Shown first, in this order, when present in [`FEATHER_ICONS`].
pub const POPULAR_FEATHER_ICONS: &[&str] = &[
    "shopping-bag", "coffee", "car", "home", "phone", "credit-card", "dollar-sign", "gift",
    "heart", "music", "camera", "book", "briefcase", "calendar", "umbrella", "airplane",
    "bicycle", "bus", "train", "truck", "pizza", "wine", "cup", "utensils", "apple",
    "sandwich", "gamepad", "tv", "headphones", "smartphone", "laptop", "monitor", "pill",
    "thermometer", "activity", "dumbbell", "zap", "sun", "moon", "cloud", "droplet", "wind",
    "fire", "leaf", "star", "flag", "lock", "key", "shield", "tool",
];

pub const FEATHER_ICONS: &[&str] = &[
    "activity", "airplay", "alert-circle", "alert-octagon", "alert-triangle", "anchor",
    "aperture", "archive", "arrow-down", "arrow-left", "arrow-right", "arrow-up", "at-sign",
    "award", "bar-chart", "bar-chart-2", "battery", "bell", "bluetooth", "book", "book-open",
    "bookmark", "box", "briefcase", "calendar", "camera", "cast", "check", "check-circle",
    "chevron-down", "chevron-right", "circle", "clipboard", "clock", "cloud", "cloud-rain",
    "code", "coffee", "compass", "copy", "cpu", "credit-card", "crop", "database", "disc",
    "dollar-sign", "download", "droplet", "edit", "eye", "feather", "file", "file-text",
    "film", "filter", "flag", "folder", "gift", "globe", "grid", "hard-drive", "hash",
    "headphones", "heart", "help-circle", "home", "image", "inbox", "info", "key", "layers",
    "life-buoy", "link", "list", "lock", "mail", "map", "map-pin", "message-circle", "mic",
    "monitor", "moon", "music", "navigation", "package", "paperclip", "percent", "phone",
    "pie-chart", "plus", "pocket", "power", "printer", "radio", "refresh-cw", "repeat",
    "save", "scissors", "search", "send", "server", "settings", "shield", "shopping-bag",
    "shopping-cart", "smartphone", "smile", "speaker", "star", "sun", "sunrise", "tablet",
    "tag", "target", "thermometer", "thumbs-up", "tool", "trash", "trending-down",
    "trending-up", "truck", "tv", "umbrella", "user", "users", "video", "watch", "wifi",
    "wind", "zap",
];

pub const EMOJI_CATEGORIES: &[(&str, &[&str])] = &[
    ("food", &["🍕", "🍔", "🍟", "🌭", "🍿", "🥐", "🧀", "🥗", "🍲", "🍛", "🍜", "🍣", "🍱", "☕", "🍺", "🍷"]),
    ("travel", &["🚗", "🚕", "🚌", "🚆", "✈️", "🚲", "⛽", "🏨", "🗺️", "🚢", "🛵", "🚇"]),
    ("activities", &["⚽", "🏏", "🎾", "🎮", "🎬", "🎵", "🎨", "🏋️", "🧘", "🎟️", "🎳", "🎯"]),
    ("objects", &["💡", "📱", "💻", "🖥️", "📚", "✏️", "🧾", "💊", "🛒", "🎁", "🔑", "🧴"]),
    ("symbols", &["❤️", "⭐", "✅", "❗", "💰", "💳", "🏦", "📈", "📉", "🔁", "♻️", "⚡"]),
    ("nature", &["🌳", "🌸", "🌞", "🌧️", "🐶", "🐱", "🌊", "🍀", "🔥", "❄️", "🌙", "🌈"]),
];

/// Feather names with popular icons first, then the rest alphabetically.
pub fn feather_catalog() -> Vec<&'static str> {
    let mut catalog: Vec<&'static str> = POPULAR_FEATHER_ICONS
        .iter()
        .copied()
        .filter(|name| FEATHER_ICONS.contains(name))
        .collect();
    let mut others: Vec<&'static str> = FEATHER_ICONS
        .iter()
        .copied()
        .filter(|name| !POPULAR_FEATHER_ICONS.contains(name))
        .collect();
    others.sort_unstable();
    catalog.extend(others);
    catalog
}

pub fn search_feather(term: &str) -> Vec<&'static str> {
    let term = term.trim().to_lowercase();
    feather_catalog()
        .into_iter()
        .filter(|name| term.is_empty() || name.contains(&term))
        .collect()
}

fn is_emoji_char(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1F600..=0x1F64F
            | 0x1F300..=0x1F5FF
            | 0x1F680..=0x1F6FF
            | 0x1F1E0..=0x1F1FF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
    )
}

/// At least one emoji code point, and short enough to be a single symbol.
pub fn is_valid_emoji(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && text.encode_utf16().count() <= MAX_EMOJI_UTF16_LEN
        && text.chars().any(is_emoji_char)
}

/// A file picked in the upload tab.
#[derive(Clone, Copy, Debug)]
pub struct SvgUpload<'a> {
    pub file_name: &'a str,
    pub content_type: Option<&'a str>,
    pub contents: &'a [u8],
}

/// Validates an upload and returns its SVG markup.
///
/// Accepts raw markup or a `data:image/svg+xml;base64,` URL.
pub fn read_svg_upload(upload: SvgUpload<'_>) -> Result<String> {
    let is_svg = upload.content_type.is_some_and(|ct| ct.contains("svg"))
        || upload.file_name.to_lowercase().ends_with(".svg");
    if !is_svg {
        return Err(MiniAppError::validation("Please select an SVG file only."));
    }
    if upload.contents.len() > MAX_SVG_BYTES {
        return Err(MiniAppError::validation("File size must be under 100KB."));
    }

    let text = std::str::from_utf8(upload.contents)
        .map_err(|_| MiniAppError::validation("Failed to read the SVG file."))?
        .trim();
    let svg = match text.strip_prefix(SVG_DATA_URL_PREFIX) {
        Some(encoded) => {
            let decoded = base64::prelude::BASE64_STANDARD
                .decode(encoded.trim())
                .map_err(|_| MiniAppError::validation("Failed to read the SVG file."))?;
            String::from_utf8(decoded)
                .map_err(|_| MiniAppError::validation("Failed to read the SVG file."))?
        }
        None => text.to_string(),
    };

    if !is_svg_markup(&svg) {
        return Err(MiniAppError::validation("Invalid SVG content"));
    }
    Ok(svg)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconSelection {
    Feather(String),
    Emoji(String),
    Upload { file_name: String, svg: String },
}

impl IconSelection {
    pub fn kind(&self) -> IconKind {
        match self {
            Self::Feather(_) => IconKind::Feather,
            Self::Emoji(_) => IconKind::Emoji,
            Self::Upload { .. } => IconKind::Upload,
        }
    }

    /// Value sent as `subcategory_icon_value`.
    pub fn value(&self) -> &str {
        match self {
            Self::Feather(name) => name,
            Self::Emoji(emoji) => emoji,
            Self::Upload { svg, .. } => svg,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Feather(name) => name,
            Self::Emoji(emoji) => emoji,
            Self::Upload { file_name, .. } => file_name,
        }
    }

    pub fn descriptor(&self) -> IconDescriptor {
        match self {
            Self::Feather(name) => IconDescriptor::Glyph(name.clone()),
            Self::Emoji(emoji) => IconDescriptor::Emoji(emoji.clone()),
            Self::Upload { svg, .. } => IconDescriptor::RawSvg(svg.clone()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IconForm {
    tab: IconKind,
    selection: Option<IconSelection>,
    feather_query: String,
    emoji_category: usize,
    custom_emoji: String,
}

impl IconForm {
    pub fn tab(&self) -> IconKind {
        self.tab
    }

    pub fn switch_tab(&mut self, tab: IconKind) {
        self.tab = tab;
    }

    pub fn selection(&self) -> Option<&IconSelection> {
        self.selection.as_ref()
    }

    pub fn set_feather_query(&mut self, query: &str) {
        self.feather_query = query.to_string();
    }

    pub fn feather_results(&self) -> Vec<&'static str> {
        search_feather(&self.feather_query)
    }

    pub fn select_feather(&mut self, name: &str) -> Result<()> {
        if !FEATHER_ICONS.contains(&name) {
            return Err(MiniAppError::validation(format!("Unknown icon: {name}")));
        }
        self.selection = Some(IconSelection::Feather(name.to_string()));
        Ok(())
    }

    pub fn select_emoji_category(&mut self, key: &str) {
        if let Some(index) = EMOJI_CATEGORIES.iter().position(|(name, _)| *name == key) {
            self.emoji_category = index;
        }
    }

    pub fn emoji_category(&self) -> &'static str {
        EMOJI_CATEGORIES
            .get(self.emoji_category)
            .map(|(name, _)| *name)
            .unwrap_or("food")
    }

    pub fn select_emoji(&mut self, emoji: &str) {
        self.selection = Some(IconSelection::Emoji(emoji.to_string()));
    }

    pub fn set_custom_emoji_input(&mut self, input: &str) {
        self.custom_emoji = input.to_string();
    }

    pub fn can_add_custom_emoji(&self) -> bool {
        is_valid_emoji(&self.custom_emoji)
    }

    pub fn add_custom_emoji(&mut self) -> Result<()> {
        if !self.can_add_custom_emoji() {
            return Err(MiniAppError::validation("Please enter a valid emoji"));
        }
        let emoji = self.custom_emoji.trim().to_string();
        self.custom_emoji.clear();
        self.select_emoji(&emoji);
        Ok(())
    }

    pub fn upload_svg(&mut self, upload: SvgUpload<'_>) -> Result<()> {
        let svg = read_svg_upload(upload)?;
        self.selection = Some(IconSelection::Upload {
            file_name: upload.file_name.to_string(),
            svg,
        });
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn preview(&self) -> Markup {
        let label = self
            .selection
            .as_ref()
            .map(IconSelection::label)
            .unwrap_or("No icon selected");
        let descriptor = self.selection.as_ref().map(IconSelection::descriptor);
        html! {
            div class="icon-preview-container" {
                div id="icon-preview" { (render::icon(descriptor.as_ref())) }
                span id="icon-preview-label" { (label) }
            }
        }
    }

    fn is_selected(&self, kind: IconKind, value: &str) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|sel| sel.kind() == kind && sel.value() == value)
    }

    pub fn render(&self) -> Markup {
        let feather = self.feather_results();
        let emojis = EMOJI_CATEGORIES
            .get(self.emoji_category)
            .map(|(_, emojis)| *emojis)
            .unwrap_or_default();

        html! {
            div class="icon-form" {
                (self.preview())
                div class="icon-type-tabs" {
                    @for kind in IconKind::ALL {
                        button
                            type="button"
                            class=(if kind == self.tab { "icon-type-tab active" } else { "icon-type-tab" })
                            data-tab=(kind.as_str())
                        { (kind.label()) }
                    }
                }
                @match self.tab {
                    IconKind::Feather => {
                        div id="feather-panel" class="icon-panel active" {
                            input type="search" id="feather-search" value=(self.feather_query);
                            div id="feather-icon-grid" {
                                @if !self.feather_query.trim().is_empty() {
                                    span class="icon-count-info" { (feather.len()) " icons found" }
                                }
                                @for name in &feather {
                                    div
                                        class=(if self.is_selected(IconKind::Feather, name) { "icon-item selected" } else { "icon-item" })
                                        data-icon-value=(name)
                                        title=(name)
                                    { (render::glyph(name)) }
                                }
                            }
                        }
                    }
                    IconKind::Emoji => {
                        div id="emoji-panel" class="icon-panel active" {
                            div class="emoji-categories" {
                                @for (index, (name, _)) in EMOJI_CATEGORIES.iter().enumerate() {
                                    button
                                        type="button"
                                        class=(if index == self.emoji_category { "emoji-category-btn active" } else { "emoji-category-btn" })
                                        data-category=(name)
                                    { (name) }
                                }
                            }
                            div id="emoji-grid" {
                                @for emoji in emojis {
                                    div
                                        class=(if self.is_selected(IconKind::Emoji, emoji) { "emoji-item selected" } else { "emoji-item" })
                                        data-icon-value=(emoji)
                                    { (emoji) }
                                }
                            }
                            div class="custom-emoji" {
                                input type="text" id="custom-emoji-input" value=(self.custom_emoji);
                                button type="button" id="emoji-add-btn" disabled[!self.can_add_custom_emoji()] { "Add" }
                            }
                        }
                    }
                    IconKind::Upload => {
                        div id="upload-panel" class="icon-panel active" {
                            div id="upload-area" class="upload-area" {
                                (render::glyph("upload"))
                                p { "Drop an SVG here or tap to choose (max 100KB)" }
                                input type="file" id="svg-file-input" accept=".svg,image/svg+xml" hidden;
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_popular_icons_first() {
        let catalog = feather_catalog();
        assert_eq!(&catalog[..3], &["shopping-bag", "coffee", "home"]);
        assert!(!catalog.contains(&"pizza"));
        assert_eq!(catalog.len(), FEATHER_ICONS.len());
    }

    #[test]
    fn search_is_substring_and_case_insensitive() {
        assert_eq!(search_feather("CHART"), vec!["bar-chart", "bar-chart-2", "pie-chart"]);
    }

    #[test]
    fn result_count_shows_only_while_searching() {
        let mut form = IconForm::default();
        form.switch_tab(IconKind::Feather);
        assert!(!form.render().0.contains("icons found"));

        form.set_feather_query("chart");
        assert_eq!(form.feather_results().len(), 3);
        assert!(form.render().0.contains("3 icons found"));

        form.set_feather_query("   ");
        assert!(!form.render().0.contains("icons found"));
    }

    #[test]
    fn emoji_validation() {
        assert!(is_valid_emoji("🍕"));
        assert!(is_valid_emoji(" ☕ "));
        assert!(!is_valid_emoji(""));
        assert!(!is_valid_emoji("abc"));
        assert!(!is_valid_emoji("🍕🍕🍕🍕🍕🍕"));
    }

    #[test]
    fn custom_emoji_becomes_selection() {
        let mut form = IconForm::default();
        form.set_custom_emoji_input("nope");
        assert!(form.add_custom_emoji().is_err());
        assert!(form.selection().is_none());

        form.set_custom_emoji_input("🚀");
        form.add_custom_emoji().unwrap();
        assert_eq!(form.selection(), Some(&IconSelection::Emoji("🚀".into())));
        assert!(!form.can_add_custom_emoji());
    }

    #[test]
    fn upload_accepts_raw_and_data_url_svg() {
        let raw = b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";
        let svg = read_svg_upload(SvgUpload {
            file_name: "brand.svg",
            content_type: None,
            contents: raw,
        })
        .unwrap();
        assert!(svg.starts_with("<svg"));

        let data_url = format!(
            "{SVG_DATA_URL_PREFIX}{}",
            base64::prelude::BASE64_STANDARD.encode(raw)
        );
        let svg = read_svg_upload(SvgUpload {
            file_name: "brand",
            content_type: Some("image/svg+xml"),
            contents: data_url.as_bytes(),
        })
        .unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn upload_rejects_wrong_type_size_and_content() {
        let not_svg = read_svg_upload(SvgUpload {
            file_name: "photo.png",
            content_type: Some("image/png"),
            contents: b"png",
        });
        assert_eq!(
            not_svg.unwrap_err().user_message(),
            "Please select an SVG file only."
        );

        let big = vec![b' '; MAX_SVG_BYTES + 1];
        let too_big = read_svg_upload(SvgUpload {
            file_name: "big.svg",
            content_type: None,
            contents: &big,
        });
        assert_eq!(too_big.unwrap_err().user_message(), "File size must be under 100KB.");

        let html = read_svg_upload(SvgUpload {
            file_name: "fake.svg",
            content_type: None,
            contents: b"<html></html>",
        });
        assert_eq!(html.unwrap_err().user_message(), "Invalid SVG content");
    }

    #[test]
    fn selection_is_independent_of_active_tab() {
        let mut form = IconForm::default();
        form.select_feather("coffee").unwrap();
        form.switch_tab(IconKind::Emoji);

        let selection = form.selection().unwrap();
        assert_eq!(selection.kind(), IconKind::Feather);
        assert_eq!(selection.value(), "coffee");
    }
}
