//! Read-only view of a transaction with link management.

use api_types::transaction::{LinkCandidate, TransactionView};
use maud::{Markup, html};

use crate::{
    api::{ApiClient, Auth},
    commit::{CommitController, CommitOutcome, CommitState, EmptyCommit},
    edit::{StagedEdit, TransactionEdit},
    error::{MiniAppError, Result},
    launch::LaunchParams,
    pages::{PageContext, edit_transaction::UNKNOWN_MERCHANT},
    render,
};

const LINK_FIELD: &str = "linked_transaction_hash";
const SAVE_LABEL: &str = "Save Link";

pub struct TransactionDetailPage {
    ctx: PageContext,
    api: ApiClient,
    transaction: TransactionView,
    /// Never contains the page's own transaction.
    candidates: Vec<LinkCandidate>,
    edit: StagedEdit<TransactionEdit>,
    commit: CommitController,
}

impl TransactionDetailPage {
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
        let hash = launch.hash()?;
        let api = ctx.client(Auth::Bearer(token.to_string()))?;

        let (transaction, mut candidates) =
            tokio::try_join!(api.transaction_by_hash(hash), api.linkable_transactions())?;
        candidates.retain(|candidate| candidate.unique_hash != transaction.unique_hash);
        tracing::info!(
            "loaded transaction {} with {} link candidates",
            render::short_hash(&transaction.unique_hash),
            candidates.len()
        );

        let edit = StagedEdit::new(&transaction)?;
        Ok(Self {
            ctx: ctx.clone(),
            api,
            transaction,
            candidates,
            edit,
            commit: CommitController::new(SAVE_LABEL, EmptyCommit::Close),
        })
    }

    pub fn transaction(&self) -> &TransactionView {
        &self.transaction
    }

    pub fn candidates(&self) -> &[LinkCandidate] {
        &self.candidates
    }

    pub fn edit(&self) -> &StagedEdit<TransactionEdit> {
        &self.edit
    }

    pub fn commit_state(&self) -> &CommitState {
        self.commit.state()
    }

    pub fn linked_hash(&self) -> Option<String> {
        self.edit.current_as(LINK_FIELD)
    }

    fn sync_main_button(&self) {
        self.ctx
            .host
            .set_main_button(&self.commit.main_button(self.edit.is_dirty()));
    }

    /// Stages a link to one of the offered candidates.
    pub fn link_to(&mut self, hash: &str) -> Result<()> {
        let offered = self.candidates.iter().any(|c| c.unique_hash == hash)
            || self.transaction.linked_transaction_hash.as_deref() == Some(hash);
        let result = if hash == self.transaction.unique_hash {
            Err(MiniAppError::SelfLink)
        } else if !offered {
            Err(MiniAppError::validation(
                "That transaction is not available for linking.",
            ))
        } else {
            self.edit.stage(LINK_FIELD, hash)
        };
        if let Err(err) = &result {
            self.ctx.report("Error linking transaction", err);
            return result;
        }
        self.sync_main_button();
        Ok(())
    }

    /// Stages removal of the current link.
    pub fn unlink(&mut self) -> Result<()> {
        if let Err(err) = self.edit.stage(LINK_FIELD, Option::<String>::None) {
            self.ctx.report("Error unlinking transaction", &err);
            return Err(err);
        }
        self.sync_main_button();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.edit.discard();
        self.sync_main_button();
    }

    pub async fn on_main_button(&mut self) -> CommitOutcome {
        let api = self.api.clone();
        self.commit
            .trigger(&mut self.edit, self.ctx.host.as_ref(), |changes| async move {
                api.patch_transaction_by_token(&changes).await
            })
            .await
    }

    fn render_candidate(&self, candidate: &LinkCandidate, linked: Option<&str>) -> Markup {
        let is_linked = linked == Some(candidate.unique_hash.as_str());
        html! {
            button
                type="button"
                class=(if is_linked { "link-candidate selected" } else { "link-candidate" })
                data-hash=(candidate.unique_hash)
            {
                span class="candidate-amount" {
                    (render::format_amount(candidate.amount, candidate.currency.as_deref()))
                }
                span class="candidate-merchant" {
                    (candidate.merchant_vpa.as_deref().unwrap_or(UNKNOWN_MERCHANT))
                }
                span class="candidate-date" {
                    (render::format_timestamp(candidate.transaction_datetime_from_sms.as_ref(), self.ctx.timezone))
                }
                @if let Some(description) = &candidate.description {
                    span class="candidate-description" { (description) }
                }
            }
        }
    }

    pub fn render(&self) -> Markup {
        let tx = &self.transaction;
        let linked = self.linked_hash();
        html! {
            main class="transaction-detail" {
                section class="transaction-summary" {
                    div id="transaction-amount" {
                        (render::format_amount(tx.amount, tx.currency.as_deref()))
                    }
                    div id="transaction-merchant" {
                        (tx.merchant_vpa.as_deref().unwrap_or(UNKNOWN_MERCHANT))
                    }
                    div id="transaction-date" {
                        (render::format_timestamp(tx.transaction_datetime_from_sms.as_ref(), self.ctx.timezone))
                    }
                    span class="status-badge" { (tx.status.label()) }
                    span class="transaction-hash" title=(tx.unique_hash) {
                        (render::short_hash(&tx.unique_hash))
                    }
                }

                section id="current-link" {
                    h2 { "Linked transaction" }
                    @match &linked {
                        Some(hash) => {
                            span class="linked-hash" title=(hash) { (render::short_hash(hash)) }
                            button type="button" id="unlink-button" { "Unlink" }
                        },
                        None => p class="empty-state" { "Not linked." }
                    }
                }

                section id="link-candidates" {
                    h2 { "Link to" }
                    @if self.candidates.is_empty() {
                        p class="empty-state" { "No linkable transactions." }
                    }
                    @for candidate in &self.candidates {
                        (self.render_candidate(candidate, linked.as_deref()))
                    }
                }

                @if !tx.raw_sms_content.is_empty() {
                    section id="raw-sms" {
                        h2 { "Original message" }
                        pre { (tx.raw_sms_content) }
                    }
                }
            }
        }
    }
}
