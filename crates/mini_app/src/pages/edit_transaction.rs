//! Edit page for the transaction a bot message links to.
//!
//! The user can assign an account and a subcategory, override the
//! reimbursable default and change the description. Nothing is sent until
//! the main button is pressed; then only the changed fields are patched.

use api_types::{account::Account, transaction::TransactionView};
use maud::{Markup, html};
use serde_json::Value;

use crate::{
    api::{ApiClient, Auth},
    commit::{CommitController, CommitOutcome, CommitState, EmptyCommit},
    edit::{StagedEdit, TransactionEdit},
    error::{MiniAppError, Result},
    launch::LaunchParams,
    pages::PageContext,
    picker::CategoryPicker,
    render::{self, TriState},
};

pub const PLACEHOLDER_ACCOUNT: &str = "Select Account";
pub const PLACEHOLDER_CATEGORY: &str = "Uncategorized";
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";
const SAVE_LABEL: &str = "Save";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Picker {
    Account,
    Category,
}

impl Picker {
    fn field(self) -> &'static str {
        match self {
            Self::Account => "account_id",
            Self::Category => "subcategory_id",
        }
    }
}

#[derive(Debug)]
struct OpenPicker {
    picker: Picker,
    /// Overlay value of the picker's field when it was opened.
    previous: Option<Value>,
}

pub struct EditTransactionPage {
    ctx: PageContext,
    api: ApiClient,
    transaction: TransactionView,
    accounts: Vec<Account>,
    categories: CategoryPicker,
    edit: StagedEdit<TransactionEdit>,
    commit: CommitController,
    open_picker: Option<OpenPicker>,
}

impl EditTransactionPage {
    /// Fetches the transaction and reference data, then shows the save
    /// button. Any failure is alerted and the button stays hidden.
    pub async fn open(ctx: PageContext, launch: &LaunchParams) -> Result<Self> {
        ctx.host.expand();
        match Self::load(&ctx, launch).await {
            Ok(page) => {
                page.sync_main_button();
                Ok(page)
            }
            Err(err) => Err(ctx.fail_startup("Failed to load transaction", err)),
        }
    }

    async fn load(ctx: &PageContext, launch: &LaunchParams) -> Result<Self> {
        let token = launch.token()?;
        let api = ctx.client(Auth::Bearer(token.to_string()))?;

        let (transaction, accounts, categories) = tokio::try_join!(
            api.transaction_by_token(),
            api.accounts(),
            api.categories()
        )?;
        tracing::info!(
            "loaded transaction {} with {} accounts and {} categories",
            render::short_hash(&transaction.unique_hash),
            accounts.len(),
            categories.len()
        );

        let edit = StagedEdit::new(&transaction)?;
        let categories = CategoryPicker::new(categories, transaction.subcategory_id);

        Ok(Self {
            ctx: ctx.clone(),
            api,
            transaction,
            accounts,
            categories,
            edit,
            commit: CommitController::new(SAVE_LABEL, EmptyCommit::Close),
            open_picker: None,
        })
    }

    pub fn transaction(&self) -> &TransactionView {
        &self.transaction
    }

    pub fn edit(&self) -> &StagedEdit<TransactionEdit> {
        &self.edit
    }

    pub fn commit_state(&self) -> &CommitState {
        self.commit.state()
    }

    pub fn open_picker(&self) -> Option<Picker> {
        self.open_picker.as_ref().map(|open| open.picker)
    }

    fn sync_main_button(&self) {
        self.ctx
            .host
            .set_main_button(&self.commit.main_button(self.edit.is_dirty()));
    }

    fn handled<T>(&self, context: &str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.ctx.report(context, err);
        }
        result
    }

    pub fn current_account_id(&self) -> Option<i64> {
        self.edit.current_as("account_id")
    }

    pub fn current_subcategory_id(&self) -> Option<i64> {
        self.edit.current_as("subcategory_id")
    }

    pub fn reimbursable_override(&self) -> TriState {
        TriState::from(self.edit.current_as::<bool>("override_reimbursable"))
    }

    fn account_name(&self) -> Option<&str> {
        let id = self.current_account_id()?;
        self.accounts
            .iter()
            .find(|account| account.id == id)
            .map(|account| account.name.as_str())
            .or_else(|| {
                self.transaction
                    .account
                    .as_ref()
                    .filter(|account| account.id == id)
                    .map(|account| account.name.as_str())
            })
    }

    pub fn account_label(&self) -> &str {
        self.account_name().unwrap_or(PLACEHOLDER_ACCOUNT)
    }

    pub fn category_label(&self) -> &str {
        let Some(id) = self.current_subcategory_id() else {
            return PLACEHOLDER_CATEGORY;
        };
        self.categories
            .find(id)
            .map(|(_, sub)| sub.name.as_str())
            .or_else(|| {
                self.transaction
                    .subcategory
                    .as_ref()
                    .filter(|sub| sub.id == id)
                    .map(|sub| sub.name.as_str())
            })
            .unwrap_or(PLACEHOLDER_CATEGORY)
    }

    pub fn show_picker(&mut self, picker: Picker) {
        let previous = self.edit.staged(picker.field()).cloned();
        if picker == Picker::Category {
            self.categories.set_selected(self.current_subcategory_id());
            self.categories.set_query("");
        }
        self.open_picker = Some(OpenPicker { picker, previous });
    }

    /// Keeps whatever was picked while the modal was open.
    pub fn confirm_picker(&mut self) {
        self.open_picker = None;
    }

    /// Drops what was picked while the modal was open.
    pub fn cancel_picker(&mut self) -> Result<()> {
        let Some(open) = self.open_picker.take() else {
            return Ok(());
        };
        self.edit.restore(open.picker.field(), open.previous)?;
        self.categories.set_selected(self.current_subcategory_id());
        self.sync_main_button();
        Ok(())
    }

    pub fn select_account(&mut self, account_id: i64) -> Result<()> {
        let result = if self.accounts.iter().any(|account| account.id == account_id) {
            self.edit.stage("account_id", account_id)
        } else {
            Err(MiniAppError::validation(format!(
                "Account {account_id} is not available."
            )))
        };
        self.handled("Error selecting account", result)?;
        self.sync_main_button();
        Ok(())
    }

    pub fn search_categories(&mut self, query: &str) {
        self.categories.set_query(query);
    }

    pub fn select_subcategory(&mut self, subcategory_id: i64) -> Result<()> {
        let result = if self.categories.select(subcategory_id) {
            self.edit.stage("subcategory_id", subcategory_id)
        } else {
            Err(MiniAppError::validation(format!(
                "Subcategory {subcategory_id} is not available."
            )))
        };
        self.handled("Error selecting category", result)?;
        self.sync_main_button();
        Ok(())
    }

    /// Blank text clears the description.
    pub fn set_description(&mut self, text: &str) -> Result<()> {
        let description = Some(text.to_string()).filter(|d| !d.trim().is_empty());
        let result = self.edit.stage("description", description);
        self.handled("Error updating description", result)?;
        self.sync_main_button();
        Ok(())
    }

    pub fn set_reimbursable_override(&mut self, state: TriState) -> Result<()> {
        let result = self
            .edit
            .stage("override_reimbursable", Option::<bool>::from(state));
        self.handled("Error updating reimbursable override", result)?;
        self.sync_main_button();
        Ok(())
    }

    /// Discards every staged change.
    pub fn reset(&mut self) {
        self.edit.discard();
        self.open_picker = None;
        self.categories.set_selected(self.transaction.subcategory_id);
        self.sync_main_button();
    }

    /// Primary action: patch the staged changes and close.
    pub async fn on_main_button(&mut self) -> CommitOutcome {
        let api = self.api.clone();
        self.commit
            .trigger(&mut self.edit, self.ctx.host.as_ref(), |changes| async move {
                api.patch_transaction_by_token(&changes).await
            })
            .await
    }

    fn subcategory_default_hint(&self) -> Option<&'static str> {
        let (_, sub) = self.categories.find(self.current_subcategory_id()?)?;
        Some(if sub.is_reimbursable {
            "Default for this category: reimbursable"
        } else {
            "Default for this category: not reimbursable"
        })
    }

    fn render_account_modal(&self) -> Markup {
        let current = self.current_account_id();
        html! {
            div class="modal" id="account-modal" {
                div class="modal-content" {
                    h2 { "Select Account" }
                    @if self.accounts.is_empty() {
                        p class="empty-state" { "No accounts found." }
                    }
                    @for account in &self.accounts {
                        button
                            type="button"
                            class=(if current == Some(account.id) { "account-option selected" } else { "account-option" })
                            data-account-id=(account.id)
                        {
                            span class="account-name" { (account.name) }
                            span class="account-meta" {
                                (account.account_type.as_str().replace('_', " ")) " ***" (account.account_last4)
                            }
                        }
                    }
                    div class="modal-actions" {
                        button type="button" class="modal-cancel" { "Cancel" }
                        button type="button" class="modal-confirm" { "Done" }
                    }
                }
            }
        }
    }

    fn render_category_modal(&self) -> Markup {
        html! {
            div class="modal" id="category-modal" {
                div class="modal-content" {
                    h2 { "Select Category" }
                    (self.categories.render())
                    div class="modal-actions" {
                        button type="button" class="modal-cancel" { "Cancel" }
                        button type="button" class="modal-confirm" { "Done" }
                    }
                }
            }
        }
    }

    pub fn render(&self) -> Markup {
        let tx = &self.transaction;
        let selected = self
            .current_subcategory_id()
            .and_then(|id| self.categories.find(id));
        let icon = selected
            .and_then(|(_, sub)| sub.icon.as_ref())
            .or_else(|| tx.subcategory.as_ref().and_then(|sub| sub.icon.as_ref()));
        let description: String = self.edit.current_as("description").unwrap_or_default();
        let linked: Option<String> = self.edit.current_as("linked_transaction_hash");

        html! {
            main class="edit-transaction" {
                section class="transaction-summary" {
                    div id="transaction-amount" {
                        (render::format_amount(tx.amount, tx.currency.as_deref()))
                    }
                    div id="transaction-merchant" {
                        (tx.merchant_vpa.as_deref().unwrap_or(UNKNOWN_MERCHANT))
                    }
                    div id="transaction-account-date" {
                        (self.account_label()) " • "
                        (render::format_timestamp(tx.transaction_datetime_from_sms.as_ref(), self.ctx.timezone))
                    }
                    span class="status-badge" { (tx.status.label()) }
                }

                section class="field" id="account-field" {
                    label { "Account" }
                    button type="button" id="account-selector" data-picker="account" {
                        (render::glyph("credit-card"))
                        span id="selected-account-name" { (self.account_label()) }
                    }
                }

                section class="field" id="category-field" {
                    label { "Category" }
                    button type="button" id="category-selector" data-picker="category" {
                        span class="category-icon" { (render::icon(icon)) }
                        span id="selected-category-name" { (self.category_label()) }
                        @if let Some((category, _)) = selected {
                            span class="parent-category" { (category.name) }
                        }
                    }
                }

                section class="field" id="reimbursable-field" {
                    label { "Reimbursable" }
                    (render::tri_state_toggle(
                        "override_reimbursable",
                        ["Default", "Yes", "No"],
                        self.reimbursable_override(),
                    ))
                    @if let Some(hint) = self.subcategory_default_hint() {
                        p class="hint" { (hint) }
                    }
                }

                section class="field" id="description-field" {
                    label for="description" { "Description" }
                    textarea id="description" rows="3" { (description) }
                }

                @if let Some(hash) = linked {
                    section class="field" id="linked-transaction" {
                        label { "Linked transaction" }
                        span class="linked-hash" title=(hash) { (render::short_hash(&hash)) }
                    }
                }

                @match self.open_picker() {
                    Some(Picker::Account) => (self.render_account_modal()),
                    Some(Picker::Category) => (self.render_category_modal()),
                    None => {}
                }
            }
        }
    }
}
