//! Finance mini app pages.
//!
//! The pages run inside a chat client's web view. They talk only to the
//! finance HTTP API and to the host through the [`Host`] trait, so every
//! page can be driven and rendered headless.

pub mod api;
pub mod commit;
pub mod edit;
pub mod error;
pub mod host;
pub mod icon;
pub mod launch;
pub mod loading;
pub mod pages;
pub mod picker;
pub mod render;

pub use api::{ApiClient, ApiError, Auth};
pub use commit::{CommitController, CommitOutcome, CommitState, EmptyCommit};
pub use edit::{EditSchema, StagedEdit};
pub use error::{MiniAppError, Result};
pub use host::{HeadlessHost, Host, HostEvent, MainButton};
pub use launch::LaunchParams;
pub use pages::{
    PageContext, edit_transaction::EditTransactionPage, settings::SettingsPage,
    transaction_detail::TransactionDetailPage,
};
pub use render::TriState;
