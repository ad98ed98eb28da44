//! Wire types exchanged with the finance API.
//!
//! The API owns every entity; these types only mirror the fields the mini
//! app reads or patches.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts RFC3339 timestamps and the naive `YYYY-MM-DDTHH:MM[:SS]` forms,
/// which are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M"))
        .map(|naive| Some(naive.and_utc().fixed_offset()))
        .map_err(serde::de::Error::custom)
}

/// A bare `{id, name}` reference embedded in other payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

pub mod transaction {
    use super::*;
    use crate::{account::AccountType, category::IconDescriptor};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        PendingAccountSelection,
        PendingCategorization,
        PendingProcessing,
        Processed,
        Failed,
        Cancelled,
        Error,
        #[serde(other)]
        Unknown,
    }

    impl TransactionStatus {
        pub fn label(self) -> &'static str {
            match self {
                Self::PendingAccountSelection => "Pending account",
                Self::PendingCategorization => "Pending category",
                Self::PendingProcessing => "Pending",
                Self::Processed => "Processed",
                Self::Failed => "Failed",
                Self::Cancelled => "Cancelled",
                Self::Error => "Error",
                Self::Unknown => "Unknown",
            }
        }
    }

    /// Account summary embedded in a transaction.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AccountRef {
        pub id: i64,
        pub name: String,
        pub account_type: AccountType,
    }

    /// Subcategory summary embedded in a transaction.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SubcategoryRef {
        pub id: i64,
        pub name: String,
        #[serde(default, rename = "icon_name")]
        pub icon: Option<IconDescriptor>,
    }

    /// A transaction as returned by `GET /transactions/get/by-token` and
    /// `GET /transactions/by-hash/{hash}`.
    ///
    /// Field names match the keys patched back through
    /// `PATCH /transactions/by-token`, so a serialized view doubles as the
    /// snapshot an edit is diffed against.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        /// Content-derived hash. Immutable, used as the linking key.
        pub unique_hash: String,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        pub amount: Option<Decimal>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub merchant_vpa: Option<String>,
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        pub transaction_datetime_from_sms: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub raw_sms_content: String,
        pub status: TransactionStatus,
        #[serde(default)]
        pub account_id: Option<i64>,
        #[serde(default)]
        pub account: Option<AccountRef>,
        #[serde(default)]
        pub subcategory_id: Option<i64>,
        #[serde(default)]
        pub subcategory: Option<SubcategoryRef>,
        #[serde(default)]
        pub linked_transaction_hash: Option<String>,
        /// `None` inherits the subcategory default.
        #[serde(default)]
        pub override_reimbursable: Option<bool>,
    }

    /// A candidate offered by `GET /transactions/linkable`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct LinkCandidate {
        pub unique_hash: String,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        pub amount: Option<Decimal>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub merchant_vpa: Option<String>,
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        pub transaction_datetime_from_sms: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub description: Option<String>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountType {
        SavingsAccount,
        Wallet,
        CreditCard,
        Cash,
        #[serde(other)]
        Unknown,
    }

    impl AccountType {
        /// Returns the canonical wire string.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::SavingsAccount => "savings_account",
                Self::Wallet => "wallet",
                Self::CreditCard => "credit_card",
                Self::Cash => "cash",
                Self::Unknown => "unknown",
            }
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountPurpose {
        #[default]
        Personal,
        Business,
    }

    impl AccountPurpose {
        pub const ALL: [AccountPurpose; 2] = [Self::Personal, Self::Business];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Personal => "personal",
                Self::Business => "business",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Personal => "Personal",
                Self::Business => "Business",
            }
        }
    }

    /// An account as listed by `GET /accounts/for-mini-app`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Account {
        pub id: i64,
        pub name: String,
        pub account_type: AccountType,
        #[serde(default)]
        pub bank_name: String,
        /// Masked card/account suffix, always four digits.
        pub account_last4: String,
        #[serde(default)]
        pub purpose: AccountPurpose,
    }
}

pub mod category {
    use std::fmt;

    use super::*;

    /// How a subcategory icon is drawn.
    ///
    /// On the wire this is a single string with a type prefix
    /// (`fthr:coffee`, `img:brand/x.svg`, `emoji:🍕`). Conversion happens
    /// here so nothing downstream parses prefixes.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(from = "String", into = "String")]
    pub enum IconDescriptor {
        /// Feather glyph name.
        Glyph(String),
        /// Path relative to the icon asset root.
        Image(String),
        Emoji(String),
        /// Inline SVG markup.
        RawSvg(String),
        /// A value with no known prefix; drawn with the fallback glyph.
        Unrecognized(String),
    }

    impl IconDescriptor {
        pub const GLYPH_PREFIX: &'static str = "fthr:";
        pub const IMAGE_PREFIX: &'static str = "img:";
        pub const EMOJI_PREFIX: &'static str = "emoji:";

        pub fn parse(raw: &str) -> Self {
            if let Some(name) = raw.strip_prefix(Self::GLYPH_PREFIX) {
                Self::Glyph(name.to_string())
            } else if let Some(path) = raw.strip_prefix(Self::IMAGE_PREFIX) {
                Self::Image(path.to_string())
            } else if let Some(emoji) = raw.strip_prefix(Self::EMOJI_PREFIX) {
                Self::Emoji(emoji.to_string())
            } else if is_svg_markup(raw) {
                Self::RawSvg(raw.to_string())
            } else {
                Self::Unrecognized(raw.to_string())
            }
        }
    }

    /// True when `raw` starts like an SVG document.
    pub fn is_svg_markup(raw: &str) -> bool {
        let trimmed = raw.trim_start();
        trimmed.starts_with("<svg") || trimmed.starts_with("<?xml")
    }

    impl From<String> for IconDescriptor {
        fn from(raw: String) -> Self {
            Self::parse(&raw)
        }
    }

    impl From<IconDescriptor> for String {
        fn from(icon: IconDescriptor) -> Self {
            icon.to_string()
        }
    }

    impl fmt::Display for IconDescriptor {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Glyph(name) => write!(f, "{}{name}", Self::GLYPH_PREFIX),
                Self::Image(path) => write!(f, "{}{path}", Self::IMAGE_PREFIX),
                Self::Emoji(emoji) => write!(f, "{}{emoji}", Self::EMOJI_PREFIX),
                Self::RawSvg(raw) | Self::Unrecognized(raw) => f.write_str(raw),
            }
        }
    }

    /// Icon source selected in the create form.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum IconKind {
        #[default]
        Feather,
        Emoji,
        Upload,
    }

    impl IconKind {
        pub const ALL: [IconKind; 3] = [Self::Feather, Self::Emoji, Self::Upload];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::Feather => "feather",
                Self::Emoji => "emoji",
                Self::Upload => "upload",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Feather => "Icons",
                Self::Emoji => "Emoji",
                Self::Upload => "Upload",
            }
        }
    }

    /// The two independent per-subcategory flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubcategoryFlag {
        IsReimbursable,
        ExcludeFromBudget,
    }

    impl SubcategoryFlag {
        pub const ALL: [SubcategoryFlag; 2] = [Self::IsReimbursable, Self::ExcludeFromBudget];

        pub fn as_str(self) -> &'static str {
            match self {
                Self::IsReimbursable => "is_reimbursable",
                Self::ExcludeFromBudget => "exclude_from_budget",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::IsReimbursable => "Reimbursable",
                Self::ExcludeFromBudget => "Exclude from Budget",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Subcategory {
        pub id: i64,
        pub name: String,
        #[serde(default, rename = "icon_name")]
        pub icon: Option<IconDescriptor>,
        #[serde(default)]
        pub is_reimbursable: bool,
        #[serde(default)]
        pub exclude_from_budget: bool,
        #[serde(default)]
        pub display_order: i32,
    }

    impl Subcategory {
        pub fn flag(&self, flag: SubcategoryFlag) -> bool {
            match flag {
                SubcategoryFlag::IsReimbursable => self.is_reimbursable,
                SubcategoryFlag::ExcludeFromBudget => self.exclude_from_budget,
            }
        }

        pub fn set_flag(&mut self, flag: SubcategoryFlag, value: bool) {
            match flag {
                SubcategoryFlag::IsReimbursable => self.is_reimbursable = value,
                SubcategoryFlag::ExcludeFromBudget => self.exclude_from_budget = value,
            }
        }
    }

    /// A category with all of its subcategories, from
    /// `GET /categories/all_details`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryDetails {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub subcategories: Vec<Subcategory>,
    }

    /// Request body for `POST /categories/create-with-subcategory`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryWithSubcategoryNew {
        pub category_name: String,
        /// Only sent when the category does not exist yet.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_description: Option<String>,
        pub subcategory_name: String,
        pub subcategory_icon_type: IconKind,
        /// Feather name, emoji, or SVG markup depending on the icon type.
        pub subcategory_icon_value: String,
        pub is_reimbursable: bool,
        pub exclude_from_budget: bool,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryWithSubcategoryCreated {
        pub category: NamedRef,
        pub subcategory: NamedRef,
    }
}

pub mod budget {
    use super::*;

    /// A monthly budget from `GET /budget/{year}/{month}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Budget {
        #[serde(default)]
        pub id: Option<i64>,
        pub year: i32,
        pub month: u32,
        #[serde(with = "rust_decimal::serde::float")]
        pub budget_amount: Decimal,
    }

    /// Request body for `POST /budget/`. Creates or replaces the month's
    /// budget.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub year: i32,
        /// 1-based month.
        pub month: u32,
        /// Must be > 0.
        #[serde(with = "rust_decimal::serde::float")]
        pub budget_amount: Decimal,
    }
}
