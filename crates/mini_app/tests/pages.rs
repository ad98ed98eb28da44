use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::{account::AccountPurpose, category::SubcategoryFlag};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use mini_app::{
    CommitOutcome, CommitState, EditTransactionPage, HeadlessHost, HostEvent, LaunchParams,
    MiniAppError, PageContext, SettingsPage, TransactionDetailPage, TriState,
    icon::SvgUpload,
    pages::{
        edit_transaction::Picker,
        settings::{BudgetStatus, CategoryChoice},
    },
};
use scraper::{Html, Selector};
use serde_json::{Value, json};

const TOKEN: &str = "launch-token";
const API_KEY: &str = "settings-key";

#[derive(Clone, Debug)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    api_key: Option<String>,
    body: Option<Value>,
}

/// Canned API: every `(method, path)` answers with a fixed status and body.
#[derive(Default)]
struct FakeApi {
    routes: Mutex<HashMap<(Method, String), (StatusCode, Value)>>,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeApi {
    fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, format!("/api/v1{path}")), (status, body));
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn writes(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|req| req.method != Method::GET)
            .collect()
    }
}

async fn handle(
    State(fake): State<Arc<FakeApi>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let path = uri.path().to_string();
    fake.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: header("authorization"),
        api_key: header("x-api-key"),
        body: serde_json::from_slice(&body).ok(),
    });

    let route = fake.routes.lock().unwrap().get(&(method, path)).cloned();
    match route {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response(),
    }
}

async fn spawn_api(fake: Arc<FakeApi>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(fake);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

fn transaction(account_id: Option<i64>, subcategory_id: Option<i64>) -> Value {
    json!({
        "id": 42,
        "unique_hash": "abc123def4567890",
        "amount": 250.0,
        "currency": "INR",
        "merchant_vpa": "grocer@upi",
        "transaction_datetime_from_sms": "2024-05-01T10:30:00",
        "description": null,
        "raw_sms_content": "Rs 250.00 debited",
        "status": "pending_categorization",
        "account_id": account_id,
        "account": account_id.map(|id| json!({"id": id, "name": "HDFC Savings", "account_type": "savings_account"})),
        "subcategory_id": subcategory_id,
        "subcategory": null,
        "linked_transaction_hash": null,
        "override_reimbursable": null
    })
}

fn accounts() -> Value {
    json!([
        {"id": 5, "name": "HDFC Savings", "account_type": "savings_account", "bank_name": "HDFC", "account_last4": "1111", "purpose": "personal"},
        {"id": 7, "name": "ICICI Credit", "account_type": "credit_card", "bank_name": "ICICI", "account_last4": "2222", "purpose": "business"}
    ])
}

fn categories() -> Value {
    json!([
        {
            "id": 1,
            "name": "Food",
            "description": null,
            "subcategories": [
                {"id": 10, "name": "Groceries", "icon_name": "fthr:shopping-cart", "is_reimbursable": false, "exclude_from_budget": false, "display_order": 1},
                {"id": 11, "name": "Restaurants", "icon_name": "emoji:🍕", "is_reimbursable": true, "exclude_from_budget": false, "display_order": 2}
            ]
        },
        {"id": 2, "name": "Travel", "description": null, "subcategories": []}
    ])
}

fn edit_api(tx: Value) -> Arc<FakeApi> {
    let fake = Arc::new(FakeApi::default());
    fake.respond(Method::GET, "/transactions/get/by-token", StatusCode::OK, tx);
    fake.respond(Method::GET, "/accounts/for-mini-app", StatusCode::OK, accounts());
    fake.respond(Method::GET, "/categories/all_details", StatusCode::OK, categories());
    fake.respond(
        Method::PATCH,
        "/transactions/by-token",
        StatusCode::OK,
        json!({"status": "ok"}),
    );
    fake
}

async fn context(fake: &Arc<FakeApi>) -> (Arc<HeadlessHost>, PageContext) {
    let base = spawn_api(fake.clone()).await;
    let host = Arc::new(HeadlessHost::new());
    let ctx = PageContext::new(host.clone(), base);
    (host, ctx)
}

fn launch() -> LaunchParams {
    LaunchParams::new(Some(TOKEN.to_string()), None)
}

fn text_of(html: &str, css: &str) -> Vec<String> {
    let doc = Html::parse_fragment(html);
    let selector = Selector::parse(css).unwrap();
    doc.select(&selector)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .collect()
}

#[tokio::test]
async fn edit_page_shows_placeholders_for_missing_relations() {
    let fake = edit_api(transaction(None, None));
    let (host, ctx) = context(&fake).await;

    let page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    let html = page.render().into_string();

    assert_eq!(text_of(&html, "#transaction-amount"), vec!["250.00 INR"]);
    assert_eq!(text_of(&html, "#selected-account-name"), vec!["Select Account"]);
    assert_eq!(text_of(&html, "#selected-category-name"), vec!["Uncategorized"]);
    assert!(host.alerts().is_empty());
    assert!(host.events().contains(&HostEvent::Expanded));
    assert!(!host.is_loading());

    let button = host.main_button().unwrap();
    assert!(button.visible && button.enabled);

    let auth: Vec<_> = fake.requests().into_iter().map(|r| r.authorization).collect();
    assert_eq!(auth.len(), 3);
    assert!(auth.iter().all(|a| a.as_deref() == Some("Bearer launch-token")));
}

#[tokio::test]
async fn commit_sends_only_changed_account() {
    let fake = edit_api(transaction(Some(5), Some(10)));
    let (host, ctx) = context(&fake).await;

    let mut page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    page.select_account(7).unwrap();
    assert_eq!(page.account_label(), "ICICI Credit");

    assert_eq!(page.on_main_button().await, CommitOutcome::Committed);

    let writes = fake.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].method, Method::PATCH);
    assert_eq!(writes[0].path, "/api/v1/transactions/by-token");
    assert_eq!(writes[0].body, Some(json!({"account_id": 7})));
    assert_eq!(page.commit_state(), &CommitState::Closed);
    assert!(host.is_closed());
    assert!(!page.edit().is_dirty());
}

#[tokio::test]
async fn commit_without_changes_closes_without_request() {
    let fake = edit_api(transaction(Some(5), Some(10)));
    let (host, ctx) = context(&fake).await;

    let mut page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    // Picking the original value again is not a change.
    page.select_account(5).unwrap();

    assert_eq!(page.on_main_button().await, CommitOutcome::ClosedUnchanged);
    assert!(fake.writes().is_empty());
    assert!(host.is_closed());
}

#[tokio::test]
async fn tri_state_override_patches_false_and_null_distinctly() {
    let fake = edit_api(transaction(Some(5), Some(11)));
    let (_host, ctx) = context(&fake).await;

    let mut page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    page.set_reimbursable_override(TriState::ForceFalse).unwrap();
    let html = page.render().into_string();
    assert_eq!(
        text_of(&html, "[data-toggle=override_reimbursable] .active-text"),
        vec!["No"]
    );

    page.set_reimbursable_override(TriState::Inherit).unwrap();
    assert!(!page.edit().is_dirty());

    page.set_reimbursable_override(TriState::ForceFalse).unwrap();
    page.set_description("Team lunch").unwrap();
    page.on_main_button().await;
    assert_eq!(
        fake.writes()[0].body,
        Some(json!({"override_reimbursable": false, "description": "Team lunch"}))
    );
}

#[tokio::test]
async fn cancelled_picker_restores_previous_choice() {
    let fake = edit_api(transaction(Some(5), Some(10)));
    let (_host, ctx) = context(&fake).await;

    let mut page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    page.show_picker(Picker::Category);
    page.search_categories("rest");
    page.select_subcategory(11).unwrap();
    assert_eq!(page.category_label(), "Restaurants");

    page.cancel_picker().unwrap();
    assert_eq!(page.open_picker(), None);
    assert_eq!(page.category_label(), "Groceries");
    assert!(!page.edit().is_dirty());
}

#[tokio::test]
async fn server_error_is_alerted_and_edit_kept() {
    let fake = edit_api(transaction(Some(5), None));
    fake.respond(
        Method::PATCH,
        "/transactions/by-token",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({"detail": "Account is archived"}),
    );
    let (host, ctx) = context(&fake).await;

    let mut page = EditTransactionPage::open(ctx, &launch()).await.unwrap();
    page.select_account(7).unwrap();

    let outcome = page.on_main_button().await;
    assert!(matches!(outcome, CommitOutcome::Failed(ref msg) if msg.contains("Account is archived")));
    assert!(matches!(page.commit_state(), CommitState::Failed(_)));
    assert!(host.alerts().iter().any(|a| a.contains("Account is archived")));
    assert!(!host.is_closed());
    assert!(page.edit().is_dirty());
    assert!(!host.is_loading());

    // A fresh attempt is allowed after a failure.
    fake.respond(
        Method::PATCH,
        "/transactions/by-token",
        StatusCode::NO_CONTENT,
        Value::Null,
    );
    assert_eq!(page.on_main_button().await, CommitOutcome::Committed);
}

#[tokio::test]
async fn missing_token_alerts_without_fetching() {
    let fake = edit_api(transaction(None, None));
    let (host, ctx) = context(&fake).await;

    let result = EditTransactionPage::open(ctx, &LaunchParams::new(None, None)).await;

    assert!(matches!(result, Err(MiniAppError::MissingLaunchParam(_))));
    assert_eq!(host.alerts(), vec!["Access token not found.".to_string()]);
    assert!(!host.main_button().unwrap().visible);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn detail_page_links_and_unlinks() {
    let fake = Arc::new(FakeApi::default());
    fake.respond(
        Method::GET,
        "/transactions/by-hash/abc123def4567890",
        StatusCode::OK,
        transaction(Some(5), None),
    );
    fake.respond(
        Method::GET,
        "/transactions/linkable",
        StatusCode::OK,
        json!([
            {"unique_hash": "abc123def4567890", "amount": 250.0, "currency": "INR"},
            {"unique_hash": "fff999", "amount": 250.0, "currency": "INR", "merchant_vpa": "refund@upi"}
        ]),
    );
    fake.respond(
        Method::PATCH,
        "/transactions/by-token",
        StatusCode::OK,
        json!({}),
    );
    let (host, ctx) = context(&fake).await;
    let launch = LaunchParams::from_url("https://example.org/detail?token=t0k&hash=abc123def4567890")
        .unwrap();

    let mut page = TransactionDetailPage::open(ctx, &launch).await.unwrap();
    assert_eq!(page.candidates().len(), 1);

    assert!(matches!(
        page.link_to("abc123def4567890"),
        Err(MiniAppError::SelfLink)
    ));
    assert!(page.link_to("unknown").is_err());
    assert_eq!(host.alerts().len(), 2);

    page.link_to("fff999").unwrap();
    let html = page.render().into_string();
    assert_eq!(text_of(&html, ".link-candidate.selected .candidate-merchant"), vec!["refund@upi"]);

    page.unlink().unwrap();
    assert!(!page.edit().is_dirty());
    page.link_to("fff999").unwrap();

    assert_eq!(page.on_main_button().await, CommitOutcome::Committed);
    assert_eq!(
        fake.writes()[0].body,
        Some(json!({"linked_transaction_hash": "fff999"}))
    );
}

#[tokio::test]
async fn detail_page_requires_hash() {
    let fake = Arc::new(FakeApi::default());
    let (host, ctx) = context(&fake).await;

    let result = TransactionDetailPage::open(ctx, &launch()).await;

    assert!(result.is_err());
    assert_eq!(host.alerts(), vec!["Transaction hash not found.".to_string()]);
    assert!(fake.requests().is_empty());
}

fn settings_api() -> Arc<FakeApi> {
    let fake = Arc::new(FakeApi::default());
    fake.respond(
        Method::GET,
        "/budget/2024/5",
        StatusCode::NOT_FOUND,
        json!({"detail": "Budget not found"}),
    );
    fake.respond(Method::GET, "/accounts/for-mini-app", StatusCode::OK, accounts());
    fake.respond(Method::GET, "/categories/all_details", StatusCode::OK, categories());
    fake
}

async fn settings_context(fake: &Arc<FakeApi>) -> (Arc<HeadlessHost>, PageContext) {
    let (host, ctx) = context(fake).await;
    (host, ctx.with_api_key(API_KEY))
}

#[tokio::test]
async fn settings_without_key_alerts() {
    let fake = settings_api();
    let (host, ctx) = context(&fake).await;

    assert!(SettingsPage::open_at(ctx, 2024, 5).await.is_err());
    assert_eq!(host.alerts(), vec!["API key not found.".to_string()]);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn missing_budget_reads_as_none_and_save_refetches() {
    let fake = settings_api();
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    assert_eq!(page.budget_status(), &BudgetStatus::Missing);
    assert_eq!(page.budget_display(), "No budget set for 5/2024.");
    assert!(host.alerts().is_empty());
    assert!(fake.requests().iter().all(|r| r.api_key.as_deref() == Some(API_KEY)));

    page.set_budget_amount_input("-10");
    assert!(page.save_budget().await.is_err());
    assert_eq!(
        host.alerts(),
        vec!["Please enter a valid positive budget amount.".to_string()]
    );
    assert!(fake.writes().is_empty());

    fake.respond(Method::POST, "/budget/", StatusCode::OK, json!({"id": 1}));
    fake.respond(
        Method::GET,
        "/budget/2024/5",
        StatusCode::OK,
        json!({"id": 1, "year": 2024, "month": 5, "budget_amount": 15000.5}),
    );
    page.set_budget_amount_input("15000.5");
    page.save_budget().await.unwrap();

    assert_eq!(
        fake.writes()[0].body,
        Some(json!({"year": 2024, "month": 5, "budget_amount": 15000.5}))
    );
    assert!(host.alerts().contains(&"Budget for 5/2024 saved successfully!".to_string()));
    assert_eq!(page.budget_display(), "Current budget for 5/2024: ₹15000.50");
}

#[tokio::test]
async fn budget_save_requires_a_month() {
    let fake = settings_api();
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    page.set_month_input("").await.unwrap();
    assert_eq!(page.budget_status(), &BudgetStatus::NoMonth);

    page.set_budget_amount_input("100");
    assert!(page.save_budget().await.is_err());
    assert_eq!(host.alerts(), vec!["Please select a month and year.".to_string()]);
    assert!(fake.writes().is_empty());
}

#[tokio::test]
async fn account_purpose_change_patches_once() {
    let fake = settings_api();
    fake.respond(Method::PATCH, "/accounts/5", StatusCode::OK, json!({}));
    let (_host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    assert!(!page.set_account_purpose(5, AccountPurpose::Personal).await.unwrap());
    assert!(page.set_account_purpose(5, AccountPurpose::Business).await.unwrap());

    let writes = fake.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "/api/v1/accounts/5");
    assert_eq!(writes[0].body, Some(json!({"purpose": "business"})));

    let html = page.render().into_string();
    assert_eq!(
        text_of(&html, "[data-account-id=\"5\"] .toggle-segment.active-text"),
        vec!["Business"]
    );
}

#[tokio::test]
async fn subcategory_flag_updates_after_success_only() {
    let fake = settings_api();
    fake.respond(
        Method::PATCH,
        "/categories/subcategories/10",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "boom"}),
    );
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    let flag = |page: &SettingsPage| page.categories()[0].subcategories[0].is_reimbursable;

    assert!(page
        .set_subcategory_flag(10, SubcategoryFlag::IsReimbursable, true)
        .await
        .is_err());
    assert!(!flag(&page));
    assert_eq!(
        host.alerts(),
        vec!["Error updating subcategory: boom".to_string()]
    );

    fake.respond(
        Method::PATCH,
        "/categories/subcategories/10",
        StatusCode::OK,
        json!({}),
    );
    page.set_subcategory_flag(10, SubcategoryFlag::IsReimbursable, true)
        .await
        .unwrap();
    assert!(flag(&page));
    assert_eq!(
        fake.writes().last().unwrap().body,
        Some(json!({"is_reimbursable": true}))
    );

    assert!(page.toggle_category(1));
    let html = page.render().into_string();
    assert_eq!(
        Html::parse_fragment(&html)
            .select(&Selector::parse("[data-subcategory-id=\"10\"] input[data-flag=is_reimbursable][checked]").unwrap())
            .count(),
        1
    );
}

#[tokio::test]
async fn create_form_validates_then_posts_new_category() {
    let fake = settings_api();
    fake.respond(
        Method::POST,
        "/categories/create-with-subcategory",
        StatusCode::OK,
        json!({"category": {"id": 3, "name": "Pets"}, "subcategory": {"id": 30, "name": "Vet"}}),
    );
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    page.open_create_form();

    assert!(page.save_category().await.is_err());
    page.set_category_name("Pets");
    assert!(page.is_creating_new_category());
    assert!(page.save_category().await.is_err());
    page.set_subcategory_name("Vet");
    assert!(page.save_category().await.is_err());
    assert_eq!(
        host.alerts(),
        vec![
            "Please enter a category name.".to_string(),
            "Please enter a subcategory name.".to_string(),
            "Please select an icon for the subcategory.".to_string(),
        ]
    );

    let upload = SvgUpload {
        file_name: "logo.png",
        content_type: Some("image/png"),
        contents: b"not an svg",
    };
    assert!(page.update_icon(|icon| icon.upload_svg(upload)).is_err());
    page.update_icon(|icon| icon.select_feather("heart")).unwrap();
    page.set_new_subcategory_flag(SubcategoryFlag::IsReimbursable, true);

    let created = page.save_category().await.unwrap();
    assert_eq!(created.subcategory.name, "Vet");
    assert_eq!(
        fake.writes().last().unwrap().body,
        Some(json!({
            "category_name": "Pets",
            "category_description": "Custom category: Pets",
            "subcategory_name": "Vet",
            "subcategory_icon_type": "feather",
            "subcategory_icon_value": "heart",
            "is_reimbursable": true,
            "exclude_from_budget": false
        }))
    );
    assert!(host
        .alerts()
        .contains(&"Created new category \"Pets\" with subcategory \"Vet\"".to_string()));
    assert!(!page.is_create_form_open());
}

#[tokio::test]
async fn existing_category_omits_description() {
    let fake = settings_api();
    fake.respond(
        Method::POST,
        "/categories/create-with-subcategory",
        StatusCode::OK,
        json!({"category": {"id": 1, "name": "Food"}, "subcategory": {"id": 12, "name": "Snacks"}}),
    );
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    page.open_create_form();
    page.set_category_name("fo");
    let choices = page.category_choices();
    assert_eq!(choices.len(), 2);
    page.choose_category(&choices[0]);
    assert!(!page.is_creating_new_category());
    page.set_category_description("ignored");
    page.set_subcategory_name("Snacks");
    page.update_icon(|icon| {
        icon.select_emoji("🍿");
        Ok(())
    })
    .unwrap();

    page.save_category().await.unwrap();
    let body = fake.writes().last().unwrap().body.clone().unwrap();
    assert!(body.get("category_description").is_none());
    assert_eq!(body["subcategory_icon_type"], "emoji");
    assert!(host
        .alerts()
        .contains(&"Added subcategory \"Snacks\" to \"Food\"".to_string()));
}

#[tokio::test]
async fn failed_refresh_after_create_keeps_the_result() {
    let fake = settings_api();
    fake.respond(
        Method::POST,
        "/categories/create-with-subcategory",
        StatusCode::OK,
        json!({"category": {"id": 1, "name": "Food"}, "subcategory": {"id": 12, "name": "Snacks"}}),
    );
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    fake.respond(
        Method::GET,
        "/categories/all_details",
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"detail": "down"}),
    );
    page.open_create_form();
    page.set_category_name("Food");
    page.set_subcategory_name("Snacks");
    page.update_icon(|icon| icon.select_feather("coffee")).unwrap();

    let created = page.save_category().await.unwrap();
    assert_eq!(created.subcategory.id, 12);
    assert!(!page.is_create_form_open());
    assert_eq!(page.categories().len(), 2);
    assert_eq!(
        host.alerts(),
        vec![
            "Added subcategory \"Snacks\" to \"Food\"".to_string(),
            "Error fetching categories: down".to_string(),
        ]
    );
}

#[tokio::test]
async fn single_letter_does_not_offer_create() {
    let fake = settings_api();
    let (_host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    page.open_create_form();
    page.set_category_name("f");
    assert_eq!(
        page.category_choices(),
        vec![CategoryChoice::Existing {
            id: 1,
            name: "Food".to_string(),
            subcategories: 2,
        }]
    );

    page.set_category_name("fi");
    assert_eq!(
        page.category_choices().last(),
        Some(&CategoryChoice::Create("fi".to_string()))
    );
}

#[tokio::test]
async fn settings_main_button_closes() {
    let fake = settings_api();
    let (host, ctx) = settings_context(&fake).await;

    let mut page = SettingsPage::open_at(ctx, 2024, 5).await.unwrap();
    assert_eq!(host.main_button().unwrap().text, "CLOSE");
    assert_eq!(page.on_main_button(), CommitOutcome::ClosedUnchanged);
    assert!(host.is_closed());
    assert!(fake.writes().is_empty());
}
