//! Settings page: monthly budget, account purposes, subcategory flags and
//! the category/subcategory creation form.
//!
//! Sections load independently. A section that fails to load is reported
//! and rendered empty; the rest of the page stays usable. Changes made here
//! are saved immediately, so the main button only closes the session.

use std::collections::BTreeSet;

use api_types::{
    account::{Account, AccountPurpose, AccountType},
    budget::{Budget, BudgetNew},
    category::{
        CategoryDetails, CategoryWithSubcategoryCreated, CategoryWithSubcategoryNew,
        IconDescriptor, SubcategoryFlag,
    },
};
use chrono::Datelike;
use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    api::{ApiClient, Auth},
    commit::{CommitController, CommitOutcome, EmptyCommit},
    edit::{AccountEdit, StagedEdit, SubcategoryEdit},
    error::{MiniAppError, Result},
    icon::IconForm,
    pages::PageContext,
    picker::fold,
    render::{self, Segment},
};

pub const CLOSE_LABEL: &str = "CLOSE";

/// Image path, relative to the icon root, for an account's bank.
pub fn bank_icon(account: &Account) -> &'static str {
    if account.account_type == AccountType::Cash {
        return "brand/bank-icon-cash.svg";
    }
    let name = account.name.to_lowercase();
    let has = |needle: &str| name.contains(needle);
    if has("hdfc") && has("dinner club") {
        "brand/diners-club.svg"
    } else if has("hdfc") {
        "brand/hdfc.svg"
    } else if has("icici") && has("amazon") {
        "brand/amazon-icici-cc.svg"
    } else if has("icici") {
        "brand/icici.svg"
    } else if has("sbi") && has("cashback") {
        "brand/sbi-cashback.svg"
    } else if has("sbi") {
        "brand/sbi.svg"
    } else if has("idfc") {
        "brand/idfc.svg"
    } else if has("federal") && has("jupiter") {
        "brand/jupiter-fed.svg"
    } else if has("federal") && has("fi") {
        "brand/fi.svg"
    } else if has("federal") {
        "brand/federal-bank-savings.svg"
    } else if has("amex") || has("american express") {
        "brand/amex.svg"
    } else {
        "brand/bank-icon-default.svg"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BudgetStatus {
    NoMonth,
    Loaded(Budget),
    Missing,
    LoadFailed,
}

#[derive(Debug)]
struct BudgetSection {
    month: Option<(i32, u32)>,
    amount_input: String,
    status: BudgetStatus,
}

/// An account row and the purpose edit staged on it.
#[derive(Debug)]
struct AccountRow {
    account: Account,
    edit: StagedEdit<AccountEdit>,
}

/// An entry of the category name dropdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryChoice {
    Existing { id: i64, name: String, subcategories: usize },
    Create(String),
}

#[derive(Debug, Default)]
struct CategoryForm {
    open: bool,
    category_name: String,
    description: String,
    subcategory_name: String,
    icon: IconForm,
    is_reimbursable: bool,
    exclude_from_budget: bool,
}

pub struct SettingsPage {
    ctx: PageContext,
    api: ApiClient,
    commit: CommitController,
    budget: BudgetSection,
    accounts: Vec<AccountRow>,
    categories: Vec<CategoryDetails>,
    expanded: BTreeSet<i64>,
    form: CategoryForm,
}

impl SettingsPage {
    /// Opens the page on the current month in the configured zone.
    pub async fn open(ctx: PageContext) -> Result<Self> {
        let today = chrono::Utc::now().with_timezone(&ctx.timezone);
        Self::open_at(ctx, today.year(), today.month()).await
    }

    pub async fn open_at(ctx: PageContext, year: i32, month: u32) -> Result<Self> {
        ctx.host.expand();
        let api = match ctx.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => ctx
                .client(Auth::ApiKey(key.to_string()))
                .map_err(|err| ctx.fail_startup("Failed to load settings", err))?,
            _ => {
                return Err(ctx.fail_startup(
                    "Failed to load settings",
                    MiniAppError::MissingLaunchParam("API key"),
                ));
            }
        };

        let mut page = Self {
            ctx,
            api,
            commit: CommitController::new(CLOSE_LABEL, EmptyCommit::Close),
            budget: BudgetSection {
                month: Some((year, month)),
                amount_input: String::new(),
                status: BudgetStatus::NoMonth,
            },
            accounts: Vec::new(),
            categories: Vec::new(),
            expanded: BTreeSet::new(),
            form: CategoryForm::default(),
        };

        let (budget, accounts, categories) = tokio::join!(
            page.api.budget(year, month),
            page.api.accounts(),
            page.api.categories()
        );
        page.apply_budget(budget.map_err(MiniAppError::from));
        match accounts {
            Ok(accounts) => page.set_accounts(accounts)?,
            Err(err) => page.ctx.report("Error fetching accounts", &err.into()),
        }
        match categories {
            Ok(categories) => page.categories = categories,
            Err(err) => page.ctx.report("Error fetching categories", &err.into()),
        }
        tracing::info!(
            "settings loaded: {} accounts, {} categories",
            page.accounts.len(),
            page.categories.len()
        );

        page.ctx
            .host
            .set_main_button(&page.commit.main_button(false));
        Ok(page)
    }

    fn set_accounts(&mut self, accounts: Vec<Account>) -> Result<()> {
        self.accounts = accounts
            .into_iter()
            .map(|account| {
                Ok(AccountRow {
                    edit: StagedEdit::new(&account)?,
                    account,
                })
            })
            .collect::<Result<_>>()?;
        Ok(())
    }

    fn notify(&self, message: &str) {
        tracing::info!("{message}");
        self.ctx.host.show_alert(message);
    }

    fn handled<T>(&self, context: &str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.ctx.report(context, err);
        }
        result
    }

    /// Closes the session; nothing is pending on this page.
    pub fn on_main_button(&mut self) -> CommitOutcome {
        self.commit.dismiss(self.ctx.host.as_ref())
    }

    // Budget

    pub fn selected_month(&self) -> Option<(i32, u32)> {
        self.budget.month
    }

    pub fn budget_status(&self) -> &BudgetStatus {
        &self.budget.status
    }

    pub fn budget_amount_input(&self) -> &str {
        &self.budget.amount_input
    }

    pub fn budget_display(&self) -> String {
        let Some((year, month)) = self.budget.month else {
            return "Please select a month and year.".to_string();
        };
        match &self.budget.status {
            BudgetStatus::NoMonth => "Please select a month and year.".to_string(),
            BudgetStatus::Loaded(budget) => format!(
                "Current budget for {month}/{year}: {}{:.2}",
                self.ctx.currency_symbol, budget.budget_amount
            ),
            BudgetStatus::Missing => format!("No budget set for {month}/{year}."),
            BudgetStatus::LoadFailed => "Error loading budget.".to_string(),
        }
    }

    fn apply_budget(&mut self, result: Result<Option<Budget>>) {
        match result {
            Ok(Some(budget)) => {
                self.budget.amount_input = budget.budget_amount.to_string();
                self.budget.status = BudgetStatus::Loaded(budget);
            }
            Ok(None) => {
                self.budget.amount_input.clear();
                self.budget.status = BudgetStatus::Missing;
            }
            Err(err) => {
                self.ctx.report("Error fetching budget", &err);
                self.budget.amount_input.clear();
                self.budget.status = BudgetStatus::LoadFailed;
            }
        }
    }

    pub async fn refresh_budget(&mut self) {
        let Some((year, month)) = self.budget.month else {
            self.budget.status = BudgetStatus::NoMonth;
            return;
        };
        let result = self.api.budget(year, month).await.map_err(MiniAppError::from);
        self.apply_budget(result);
    }

    pub async fn select_month(&mut self, year: i32, month: u32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return self.handled(
                "Error selecting month",
                Err(MiniAppError::validation("Please select a month and year.")),
            );
        }
        self.budget.month = Some((year, month));
        self.refresh_budget().await;
        Ok(())
    }

    /// Accepts the `YYYY-MM` value of a month input; blank clears it.
    pub async fn set_month_input(&mut self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            self.budget.month = None;
            self.budget.status = BudgetStatus::NoMonth;
            return Ok(());
        }
        let parsed = value
            .split_once('-')
            .and_then(|(year, month)| Some((year.parse::<i32>().ok()?, month.parse::<u32>().ok()?)));
        match parsed {
            Some((year, month)) => self.select_month(year, month).await,
            None => self.handled(
                "Error selecting month",
                Err(MiniAppError::validation("Please select a month and year.")),
            ),
        }
    }

    pub fn set_budget_amount_input(&mut self, value: &str) {
        self.budget.amount_input = value.to_string();
    }

    pub async fn save_budget(&mut self) -> Result<()> {
        let Some((year, month)) = self.budget.month else {
            return self.handled(
                "Error saving budget",
                Err(MiniAppError::validation("Please select a month and year.")),
            );
        };
        let amount = match self.budget.amount_input.trim().parse::<Decimal>() {
            Ok(amount) if amount > Decimal::ZERO => amount,
            _ => {
                return self.handled(
                    "Error saving budget",
                    Err(MiniAppError::validation(
                        "Please enter a valid positive budget amount.",
                    )),
                );
            }
        };

        let payload = BudgetNew {
            year,
            month,
            budget_amount: amount,
        };
        let result = self.api.save_budget(&payload).await.map_err(MiniAppError::from);
        self.handled("Error saving budget", result)?;
        self.notify(&format!("Budget for {month}/{year} saved successfully!"));
        self.refresh_budget().await;
        Ok(())
    }

    // Accounts

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().map(|row| &row.account)
    }

    /// Saves a new purpose for an account. Returns `false` when the account
    /// already has it and nothing was sent.
    pub async fn set_account_purpose(
        &mut self,
        account_id: i64,
        purpose: AccountPurpose,
    ) -> Result<bool> {
        let Some(index) = self
            .accounts
            .iter()
            .position(|row| row.account.id == account_id)
        else {
            return self.handled(
                "Error updating account purpose",
                Err(MiniAppError::validation(format!(
                    "Account {account_id} is not available."
                ))),
            );
        };

        let row = &mut self.accounts[index];
        if row.account.purpose == purpose {
            return Ok(false);
        }
        if let Err(err) = row.edit.stage("purpose", purpose) {
            self.ctx.report("Error updating account purpose", &err);
            return Err(err);
        }
        let changes = row.edit.diff();

        match self.api.patch_account(account_id, &changes).await {
            Ok(()) => {
                let row = &mut self.accounts[index];
                row.edit.commit_succeeded();
                row.account.purpose = purpose;
                tracing::info!("account {account_id} purpose set to {}", purpose.as_str());
                Ok(true)
            }
            Err(err) => {
                self.accounts[index].edit.discard();
                let err = MiniAppError::from(err);
                self.ctx.report("Error updating account purpose", &err);
                Err(err)
            }
        }
    }

    // Subcategory flags

    pub fn categories(&self) -> &[CategoryDetails] {
        &self.categories
    }

    pub async fn refresh_categories(&mut self) -> Result<()> {
        let result = self.api.categories().await.map_err(MiniAppError::from);
        self.categories = self.handled("Error fetching categories", result)?;
        Ok(())
    }

    /// Expands or collapses a category; returns whether it is now expanded.
    pub fn toggle_category(&mut self, category_id: i64) -> bool {
        if self.expanded.remove(&category_id) {
            false
        } else {
            self.expanded.insert(category_id);
            true
        }
    }

    pub fn is_expanded(&self, category_id: i64) -> bool {
        self.expanded.contains(&category_id)
    }

    /// Saves one flag of a subcategory. Local state changes only once the
    /// server accepted it.
    pub async fn set_subcategory_flag(
        &mut self,
        subcategory_id: i64,
        flag: SubcategoryFlag,
        value: bool,
    ) -> Result<()> {
        let found = self.categories.iter().find_map(|category| {
            category
                .subcategories
                .iter()
                .find(|sub| sub.id == subcategory_id)
        });
        let Some(sub) = found else {
            return self.handled(
                "Error updating subcategory",
                Err(MiniAppError::validation(format!(
                    "Subcategory {subcategory_id} is not available."
                ))),
            );
        };

        let staged = StagedEdit::<SubcategoryEdit>::new(sub).and_then(|mut edit| {
            edit.stage(flag.as_str(), value)?;
            Ok(edit.diff())
        });
        let changes = self.handled("Error updating subcategory", staged)?;
        if changes.is_empty() {
            return Ok(());
        }

        let result = self
            .api
            .patch_subcategory(subcategory_id, &changes)
            .await
            .map_err(MiniAppError::from);
        self.handled("Error updating subcategory", result)?;

        if let Some(sub) = self
            .categories
            .iter_mut()
            .flat_map(|category| category.subcategories.iter_mut())
            .find(|sub| sub.id == subcategory_id)
        {
            sub.set_flag(flag, value);
        }
        self.notify(&format!("Subcategory {} updated.", flag.label()));
        Ok(())
    }

    // Category creation

    pub fn open_create_form(&mut self) {
        self.form = CategoryForm {
            open: true,
            ..CategoryForm::default()
        };
    }

    pub fn close_create_form(&mut self) {
        self.form = CategoryForm::default();
    }

    pub fn is_create_form_open(&self) -> bool {
        self.form.open
    }

    fn existing_category(&self, name: &str) -> Option<&CategoryDetails> {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|category| category.name.to_lowercase() == name)
    }

    /// True when the typed name matches no existing category.
    pub fn is_creating_new_category(&self) -> bool {
        let name = self.form.category_name.trim();
        !name.is_empty() && self.existing_category(name).is_none()
    }

    pub fn set_category_name(&mut self, name: &str) {
        self.form.category_name = name.to_string();
        if !self.is_creating_new_category() {
            self.form.description.clear();
        }
    }

    /// Existing categories containing the typed name, then a create option
    /// when no name matches exactly.
    pub fn category_choices(&self) -> Vec<CategoryChoice> {
        let typed = self.form.category_name.trim();
        if typed.is_empty() {
            return Vec::new();
        }
        let needle = fold(typed);
        let mut choices: Vec<CategoryChoice> = self
            .categories
            .iter()
            .filter(|category| fold(&category.name).contains(&needle))
            .map(|category| CategoryChoice::Existing {
                id: category.id,
                name: category.name.clone(),
                subcategories: category.subcategories.len(),
            })
            .collect();
        if self.existing_category(typed).is_none() && typed.chars().count() > 1 {
            choices.push(CategoryChoice::Create(typed.to_string()));
        }
        choices
    }

    pub fn choose_category(&mut self, choice: &CategoryChoice) {
        match choice {
            CategoryChoice::Existing { name, .. } => {
                self.form.category_name = name.clone();
                self.form.description.clear();
            }
            CategoryChoice::Create(name) => self.form.category_name = name.clone(),
        }
    }

    /// Ignored unless a new category is being created.
    pub fn set_category_description(&mut self, description: &str) {
        if self.is_creating_new_category() {
            self.form.description = description.to_string();
        }
    }

    pub fn set_subcategory_name(&mut self, name: &str) {
        self.form.subcategory_name = name.to_string();
    }

    pub fn set_new_subcategory_flag(&mut self, flag: SubcategoryFlag, value: bool) {
        match flag {
            SubcategoryFlag::IsReimbursable => self.form.is_reimbursable = value,
            SubcategoryFlag::ExcludeFromBudget => self.form.exclude_from_budget = value,
        }
    }

    pub fn icon_form(&self) -> &IconForm {
        &self.form.icon
    }

    /// Runs an action on the icon picker, alerting its validation errors.
    pub fn update_icon<T>(&mut self, action: impl FnOnce(&mut IconForm) -> Result<T>) -> Result<T> {
        let result = action(&mut self.form.icon);
        self.handled("Error selecting icon", result)
    }

    fn category_payload(&self) -> Result<CategoryWithSubcategoryNew> {
        let category_name = self.form.category_name.trim();
        if category_name.is_empty() {
            return Err(MiniAppError::validation("Please enter a category name."));
        }
        let subcategory_name = self.form.subcategory_name.trim();
        if subcategory_name.is_empty() {
            return Err(MiniAppError::validation("Please enter a subcategory name."));
        }
        let Some(icon) = self.form.icon.selection() else {
            return Err(MiniAppError::validation(
                "Please select an icon for the subcategory.",
            ));
        };

        let category_description = self.is_creating_new_category().then(|| {
            let description = self.form.description.trim();
            if description.is_empty() {
                format!("Custom category: {category_name}")
            } else {
                description.to_string()
            }
        });

        Ok(CategoryWithSubcategoryNew {
            category_name: category_name.to_string(),
            category_description,
            subcategory_name: subcategory_name.to_string(),
            subcategory_icon_type: icon.kind(),
            subcategory_icon_value: icon.value().to_string(),
            is_reimbursable: self.form.is_reimbursable,
            exclude_from_budget: self.form.exclude_from_budget,
        })
    }

    pub async fn save_category(&mut self) -> Result<CategoryWithSubcategoryCreated> {
        let payload = self.category_payload();
        let payload = self.handled("Error creating category/subcategory", payload)?;
        let creating = payload.category_description.is_some();

        let result = self
            .api
            .create_category_with_subcategory(&payload)
            .await
            .map_err(MiniAppError::from);
        let created = self.handled("Error creating category/subcategory", result)?;

        let message = if creating {
            format!(
                "Created new category \"{}\" with subcategory \"{}\"",
                created.category.name, created.subcategory.name
            )
        } else {
            format!(
                "Added subcategory \"{}\" to \"{}\"",
                created.subcategory.name, created.category.name
            )
        };
        self.notify(&message);
        self.close_create_form();
        if let Err(err) = self.refresh_categories().await {
            tracing::warn!("failed to refresh categories after create: {err}");
        }
        Ok(created)
    }

    // Rendering

    fn render_budget(&self) -> Markup {
        let month_value = self
            .budget
            .month
            .map(|(year, month)| format!("{year:04}-{month:02}"))
            .unwrap_or_default();
        html! {
            section class="settings-section" id="budget-section" {
                h2 { "Monthly Budget" }
                input type="month" id="budget-month-year" value=(month_value);
                input type="number" id="budget-amount" min="0" step="0.01" value=(self.budget.amount_input);
                button type="button" id="save-monthly-budget-btn" { "Save Budget" }
                p id="current-budget-display" { (self.budget_display()) }
            }
        }
    }

    fn render_account(&self, account: &Account) -> Markup {
        let segments: Vec<Segment<'_>> = AccountPurpose::ALL
            .iter()
            .map(|purpose| Segment {
                value: purpose.as_str(),
                label: purpose.label(),
            })
            .collect();
        let active = AccountPurpose::ALL
            .iter()
            .position(|purpose| *purpose == account.purpose)
            .unwrap_or_default();
        let icon = IconDescriptor::Image(bank_icon(account).to_string());
        html! {
            div class="account-list-item" data-account-id=(account.id) {
                div class="account-info" {
                    div class="account-item-icon" { (render::icon(Some(&icon))) }
                    div class="account-name-details" {
                        span class="account-name-settings" { (account.name) }
                        span class="account-meta-settings" {
                            (account.account_type.as_str().replace('_', " ")) " ***" (account.account_last4)
                        }
                    }
                }
                (render::segmented_toggle("purpose", &segments, active))
            }
        }
    }

    fn render_categories(&self) -> Markup {
        html! {
            section class="settings-section" id="categories-section" {
                h2 { "Subcategory Rules" }
                @if self.categories.is_empty() {
                    p class="empty-state" { "No categories found." }
                }
                @for category in &self.categories {
                    @let expanded = self.is_expanded(category.id);
                    div class=(if expanded { "category-group-settings expanded" } else { "category-group-settings" })
                        data-category-id=(category.id)
                    {
                        div class="category-header-settings" {
                            span class="category-title-settings" { (category.name) }
                            i data-feather=(if expanded { "chevron-down" } else { "chevron-right" }) class="category-chevron" {}
                        }
                        @if expanded {
                            div class="subcategories-list-settings" {
                                @if category.subcategories.is_empty() {
                                    p class="empty-state" { "No subcategories." }
                                }
                                @for sub in &category.subcategories {
                                    div class="subcategory-item-settings" data-subcategory-id=(sub.id) {
                                        div class="subcategory-info-settings" {
                                            div class="subcategory-icon-settings" { (render::icon(sub.icon.as_ref())) }
                                            span class="subcategory-name-settings" { (sub.name) }
                                        }
                                        div class="subcategory-toggles-container" {
                                            @for flag in SubcategoryFlag::ALL {
                                                (render::switch(flag.as_str(), flag.label(), sub.flag(flag)))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_create_form(&self) -> Markup {
        let creating = self.is_creating_new_category();
        html! {
            div class="modal" id="category-creation-modal" {
                div class="modal-content" {
                    h2 { "Add Category" }
                    div class="form-group" {
                        label for="category-name-input" { "Category" }
                        input type="text" id="category-name-input" value=(self.form.category_name);
                        div id="category-dropdown" {
                            @for choice in self.category_choices() {
                                @match choice {
                                    CategoryChoice::Existing { id, name, subcategories } => {
                                        div class="category-dropdown-item" data-category-id=(id) {
                                            span { (name) }
                                            span class="hint" { (subcategories) " subcategories" }
                                        }
                                    },
                                    CategoryChoice::Create(name) => {
                                        div class="category-dropdown-item create-new" {
                                            span { "Create \"" (name) "\"" }
                                            (render::glyph("plus"))
                                        }
                                    },
                                }
                            }
                        }
                    }
                    div class="form-group" {
                        label for="category-description-input" { "Description" }
                        textarea id="category-description-input" disabled[!creating] { (self.form.description) }
                    }
                    div class="form-group" {
                        label for="subcategory-name-input" { "Subcategory" }
                        input type="text" id="subcategory-name-input" value=(self.form.subcategory_name);
                    }
                    (self.form.icon.render())
                    label class="checkbox" {
                        input type="checkbox" id="is-reimbursable-checkbox" checked[self.form.is_reimbursable];
                        " Reimbursable"
                    }
                    label class="checkbox" {
                        input type="checkbox" id="exclude-from-budget-checkbox" checked[self.form.exclude_from_budget];
                        " Exclude from Budget"
                    }
                    div class="modal-actions" {
                        button type="button" id="close-category-modal" { "Cancel" }
                        button type="button" id="save-category-btn" { "Save" }
                    }
                }
            }
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            main class="settings" {
                (self.render_budget())
                section class="settings-section" id="accounts-section" {
                    h2 { "Account Purpose" }
                    div id="accounts-list-container" {
                        @if self.accounts.is_empty() {
                            p class="empty-state" { "No accounts found." }
                        }
                        @for account in self.accounts() {
                            (self.render_account(account))
                        }
                    }
                }
                (self.render_categories())
                button type="button" id="open-category-modal" { "Add Category" }
                @if self.form.open {
                    (self.render_create_form())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, account_type: AccountType) -> Account {
        Account {
            id: 1,
            name: name.to_string(),
            account_type,
            bank_name: String::new(),
            account_last4: "1234".to_string(),
            purpose: AccountPurpose::Personal,
        }
    }

    #[test]
    fn bank_icons_follow_name_keywords() {
        let cases = [
            ("HDFC Dinner Club", AccountType::CreditCard, "brand/diners-club.svg"),
            ("HDFC Savings", AccountType::SavingsAccount, "brand/hdfc.svg"),
            ("Amazon ICICI", AccountType::CreditCard, "brand/amazon-icici-cc.svg"),
            ("SBI Cashback", AccountType::CreditCard, "brand/sbi-cashback.svg"),
            ("Federal Jupiter", AccountType::SavingsAccount, "brand/jupiter-fed.svg"),
            ("American Express", AccountType::CreditCard, "brand/amex.svg"),
            ("Wallet", AccountType::Cash, "brand/bank-icon-cash.svg"),
            ("Paytm", AccountType::Wallet, "brand/bank-icon-default.svg"),
        ];
        for (name, account_type, expected) in cases {
            assert_eq!(bank_icon(&account(name, account_type)), expected, "{name}");
        }
    }
}
