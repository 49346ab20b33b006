//! Page controller tests against the in-process shop
//!
//! Each test builds its own shop, session store and prompt so recorded
//! calls and notices belong to that test alone.

use std::sync::Arc;
use std::time::Duration;

use shopdesk_core::adapters::{ApiCall, InMemoryShop, MemorySessionStore, ScriptedPrompt};
use shopdesk_core::domain::{ProductField, REQUIRED_FIELDS_MESSAGE};
use shopdesk_core::pages::{
    CartDetailsPage, CartsPage, CategoriesPage, LoginPage, PageContext, PageView,
    ProductDetailsPage, ProductListPage, Route,
};
use shopdesk_core::ports::ShopApi;
use shopdesk_core::services::logging::events;
use shopdesk_core::services::{
    AuthService, EntryPoint, LoggingService, ProductCatalog, ProductStore, ProductsHook,
};
use tempfile::TempDir;
use tokio::time::advance;

struct Harness {
    shop: Arc<InMemoryShop>,
    prompt: Arc<ScriptedPrompt>,
    ctx: PageContext,
}

fn harness_with(shop: InMemoryShop, answer: bool) -> Harness {
    let shop = Arc::new(shop);
    let api: Arc<dyn ShopApi> = shop.clone();
    let auth = Arc::new(
        AuthService::open(Arc::clone(&api), Arc::new(MemorySessionStore::new()), None).unwrap(),
    );
    let prompt = Arc::new(ScriptedPrompt::answering(answer));
    let ctx = PageContext {
        api: Arc::clone(&api),
        catalog: Arc::new(ProductCatalog::new(api)),
        auth,
        prompt: prompt.clone(),
        logger: None,
    };
    Harness { shop, prompt, ctx }
}

fn harness() -> Harness {
    harness_with(InMemoryShop::seeded(), true)
}

// ============================================================================
// Product list
// ============================================================================

#[tokio::test]
async fn test_product_list_mount_loads_products_and_categories() {
    let h = harness();
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());
    assert!(page.view().is_loading());

    page.mount().await;

    assert_eq!(page.products().len(), 8);
    assert!(page.categories().contains(&"smartphones".to_string()));
    assert_eq!(page.selected_category(), "all");
    assert!(matches!(page.view(), PageView::Ready(products) if products.len() == 8));
}

#[tokio::test]
async fn test_product_list_mount_failure() {
    let h = harness();
    h.shop.fail_with(500, None);
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());

    page.mount().await;

    assert_eq!(page.view(), PageView::Error("Failed to fetch data"));
}

#[tokio::test(start_paused = true)]
async fn test_search_is_debounced() {
    let h = harness();
    let (mut page, mut ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;
    h.shop.reset_calls();

    page.type_search("i");
    advance(Duration::from_millis(100)).await;
    page.type_search("ip");
    advance(Duration::from_millis(100)).await;
    page.type_search("iphone");
    assert!(page.is_search_pending());
    assert!(h.shop.calls().is_empty());

    let value = ticks.recv().await.unwrap();
    assert_eq!(value, "iphone");
    page.apply_debounced_search(value).await;

    assert_eq!(
        h.shop.calls(),
        vec![ApiCall::SearchProducts("iphone".to_string())]
    );
    assert_eq!(page.products().len(), 2);
    assert_eq!(page.search_input(), "iphone");
}

#[tokio::test(start_paused = true)]
async fn test_finish_search_applies_delivered_value() {
    let h = harness();
    let (mut page, mut ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;
    h.shop.reset_calls();

    page.type_search("iphone");
    advance(Duration::from_millis(500)).await;
    while page.is_search_pending() {
        tokio::task::yield_now().await;
    }

    // Sent by the timer but never read from the channel
    assert!(page.finish_search(&mut ticks).await);
    assert_eq!(
        h.shop.calls(),
        vec![ApiCall::SearchProducts("iphone".to_string())]
    );
    assert_eq!(page.products().len(), 2);
    assert!(!page.finish_search(&mut ticks).await);
}

#[tokio::test(start_paused = true)]
async fn test_finish_search_waits_for_pending_value() {
    let h = harness();
    let (mut page, mut ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;
    h.shop.reset_calls();

    page.type_search("apple");
    assert!(page.finish_search(&mut ticks).await);
    assert_eq!(
        h.shop.calls(),
        vec![ApiCall::SearchProducts("apple".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_now_skips_debounce() {
    let h = harness();
    let (mut page, mut ticks) = ProductListPage::new(h.ctx.clone());

    page.type_search("mas");
    page.search_now("mascara").await;
    assert!(!page.is_search_pending());

    advance(Duration::from_secs(1)).await;
    assert!(ticks.try_recv().is_err());
    assert_eq!(
        h.shop.calls(),
        vec![ApiCall::SearchProducts("mascara".to_string())]
    );
    assert_eq!(page.products()[0].id, 1);
}

#[tokio::test]
async fn test_category_takes_precedence_over_search() {
    let h = harness();
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;

    page.select_category("smartphones").await;
    page.search_now("mascara").await;

    assert!(page.products().iter().all(|p| p.category == "smartphones"));
    assert!(!h
        .shop
        .calls()
        .contains(&ApiCall::SearchProducts("mascara".to_string())));

    page.select_category("all").await;
    assert_eq!(page.products().len(), 1);
    assert_eq!(page.products()[0].id, 1);
}

#[tokio::test]
async fn test_category_failure_message() {
    let h = harness();
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;
    h.shop.fail_with(500, None);

    page.select_category("beauty").await;

    assert_eq!(
        page.view(),
        PageView::Error("Failed to fetch products by category")
    );
}

#[tokio::test]
async fn test_add_product_with_missing_title_sends_nothing() {
    let h = harness();
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;
    h.shop.reset_calls();

    page.open_add_form();
    page.set_field(ProductField::Price, "25");
    page.set_field(ProductField::Category, "furniture");

    assert!(page.submit_new_product().await.is_none());
    assert_eq!(page.form_error(), Some(REQUIRED_FIELDS_MESSAGE));
    assert!(h.shop.calls().is_empty());
    assert!(page.form().is_some());
}

#[tokio::test]
async fn test_add_product_refetches_and_shows_created() {
    let h = harness();
    let (mut page, _ticks) = ProductListPage::new(h.ctx.clone());
    page.mount().await;

    page.open_add_form();
    page.set_field(ProductField::Title, "Desk Lamp");
    page.set_field(ProductField::Price, "25");
    page.set_field(ProductField::Category, "furniture");

    let created = page.submit_new_product().await.unwrap();

    assert_eq!(created.id, 145);
    assert!(page.products().iter().any(|p| p.id == 145));
    assert!(page.form().is_none());
    assert!(h.prompt.notices()[0].contains("created successfully with ID: 145"));
    assert!(h
        .shop
        .calls()
        .contains(&ApiCall::CreateProduct("Desk Lamp".to_string())));
}

// ============================================================================
// Product details
// ============================================================================

#[tokio::test]
async fn test_product_details_without_id() {
    let h = harness();
    let mut page = ProductDetailsPage::new(h.ctx.clone(), None);

    page.mount().await;

    assert_eq!(page.view(), PageView::Error("No product ID provided"));
    assert!(h.shop.calls().is_empty());
}

#[tokio::test]
async fn test_product_details_unknown_id() {
    let h = harness();
    let mut page = ProductDetailsPage::new(h.ctx.clone(), Some(999));

    page.mount().await;

    assert_eq!(page.view(), PageView::Error("Failed to fetch product details"));
}

#[tokio::test]
async fn test_product_edit_applies_locally() {
    let h = harness();
    let mut page = ProductDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    page.start_edit();
    page.form_mut().title = Some("Essence Mascara".to_string());
    page.form_mut().price = Some(8.5);
    assert!(page.save().await);

    let product = page.product().unwrap();
    assert_eq!(product.title, "Essence Mascara");
    assert_eq!(product.price, 8.5);
    assert!(!page.is_editing());
    assert!(h.prompt.notices()[0].contains("updated successfully"));
}

#[tokio::test]
async fn test_cancel_edit_restores_form() {
    let h = harness();
    let mut page = ProductDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    page.start_edit();
    page.form_mut().title = Some("Changed".to_string());
    page.cancel_edit();

    assert_eq!(
        page.form().title.as_deref(),
        Some("Essence Mascara Lash Princess")
    );
    assert!(!page.is_editing());
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let h = harness_with(InMemoryShop::seeded(), false);
    let mut page = ProductDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    assert!(page.delete().await.is_none());

    assert_eq!(h.prompt.confirmations().len(), 1);
    assert!(!h.shop.calls().contains(&ApiCall::DeleteProduct(1)));
}

#[tokio::test]
async fn test_confirmed_delete_navigates_to_products() {
    let h = harness();
    let mut page = ProductDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    assert_eq!(page.delete().await, Some(Route::Products));
    assert!(h.prompt.notices()[0].contains("has been deleted successfully"));
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_select_and_back() {
    let h = harness();
    let mut page = CategoriesPage::new(h.ctx.clone());
    page.mount().await;
    assert_eq!(page.title(), "Categories");

    page.select("smartphones").await;
    assert_eq!(page.title(), "Smartphones Products");
    assert_eq!(page.products().len(), 2);

    page.back();
    assert_eq!(page.selected(), None);
    assert!(page.products().is_empty());
}

#[tokio::test]
async fn test_categories_failure() {
    let h = harness();
    h.shop.fail_with(503, None);
    let mut page = CategoriesPage::new(h.ctx.clone());

    page.mount().await;

    assert_eq!(page.view().error(), Some("Failed to fetch categories"));
}

// ============================================================================
// Carts
// ============================================================================

#[tokio::test]
async fn test_carts_error_uses_server_message() {
    let h = harness();
    h.shop.fail_with(500, Some("database offline"));
    let mut page = CartsPage::new(h.ctx.clone());

    page.load().await;
    assert_eq!(page.view(), PageView::Error("database offline"));

    h.shop.fail_with(500, None);
    page.load().await;
    assert_eq!(page.view(), PageView::Error("Failed to load carts"));
}

#[tokio::test]
async fn test_add_cart_shows_new_cart() {
    let h = harness();
    let mut page = CartsPage::new(h.ctx.clone());
    page.load().await;
    assert_eq!(page.form.product_id, 144);

    let created = page.submit_add_cart().await.unwrap();

    assert!(page.carts().iter().any(|c| c.id == created.id));
    assert_eq!(h.prompt.notices(), vec!["Cart added.".to_string()]);
}

#[tokio::test]
async fn test_add_item_merges_into_cart() {
    let h = harness();
    let mut page = CartDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    page.form.product_id = 1;
    page.form.quantity = 2;
    assert!(page.add_item().await);

    let cart = page.cart().unwrap();
    assert_eq!(cart.quantity_of(1), Some(2));
    assert_eq!(cart.quantity_of(144), Some(1));
    assert!(h
        .shop
        .calls()
        .contains(&ApiCall::UpdateCart { id: 1, merge: true }));
    assert!(!page.is_saving());
}

#[tokio::test]
async fn test_add_item_reload_failure_skips_notice() {
    let h = harness();
    let mut page = CartDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;
    h.shop.fail_call(ApiCall::GetCart(1), 500, None);

    assert!(!page.add_item().await);

    assert_eq!(page.error(), Some("Failed to load cart"));
    assert!(h.prompt.notices().is_empty());
    assert!(!page.is_saving());
}

#[tokio::test]
async fn test_cart_details_without_id() {
    let h = harness();
    let mut page = CartDetailsPage::new(h.ctx.clone(), None);

    page.mount().await;

    assert_eq!(page.view(), PageView::Error("No cart id"));
}

#[tokio::test]
async fn test_delete_cart_navigates_to_carts() {
    let h = harness();
    let mut page = CartDetailsPage::new(h.ctx.clone(), Some(1));
    page.mount().await;

    assert_eq!(page.delete().await, Some(Route::Carts));
    assert_eq!(h.prompt.confirmations(), vec!["Delete this cart?".to_string()]);

    let carts = h.shop.list_carts(None).await.unwrap();
    assert!(carts.carts.iter().all(|c| c.id != 1));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_requires_both_fields() {
    let h = harness();
    let mut page = LoginPage::new(Arc::clone(&h.ctx.auth));
    page.username = "emilys".to_string();

    assert!(page.submit().await.is_none());
    assert_eq!(page.error(), Some("Please enter your username and password"));
    assert!(h.shop.calls().is_empty());
}

#[tokio::test]
async fn test_login_failure_shows_server_message() {
    let h = harness();
    let mut page = LoginPage::new(Arc::clone(&h.ctx.auth));
    page.username = "emilys".to_string();
    page.password = "wrong".to_string();

    assert!(page.submit().await.is_none());
    assert_eq!(page.error(), Some("Invalid credentials"));
    assert!(!h.ctx.auth.is_logged_in());
}

#[tokio::test]
async fn test_login_attaches_token_to_later_requests() {
    let h = harness();
    let mut page = LoginPage::new(Arc::clone(&h.ctx.auth));
    page.username = "emilys".to_string();
    page.password = "emilyspass".to_string();

    assert_eq!(page.submit().await, Some(Route::Home));
    assert_eq!(page.user().map(|u| u.id), Some(1));

    let mut carts = CartsPage::new(h.ctx.clone());
    assert_eq!(carts.form.user_id, 1);
    carts.load().await;

    let seen = h.shop.credentials_seen();
    let last = seen.last().cloned().flatten().unwrap();
    assert!(last.starts_with("demo-token-1-"));
}

// ============================================================================
// Global product store
// ============================================================================

#[tokio::test]
async fn test_products_hook_fetches_once() {
    let h = harness();
    let store = Arc::new(ProductStore::new());
    let hook = ProductsHook::new(
        Arc::clone(&store),
        Arc::clone(&h.ctx.catalog),
        Arc::clone(&h.ctx.auth),
    );

    let first = hook.use_products().await;
    let second = hook.use_products().await;

    assert_eq!(first.products.len(), 8);
    assert_eq!(first, second);
    assert_eq!(store.state().products.len(), 8);
    assert_eq!(h.shop.calls(), vec![ApiCall::ListProducts]);
}

// ============================================================================
// Event log
// ============================================================================

#[tokio::test]
async fn test_page_errors_are_logged() {
    let temp = TempDir::new().unwrap();
    let logger = Arc::new(LoggingService::new(temp.path(), EntryPoint::Embedded, "test").unwrap());

    let mut h = harness();
    h.ctx.logger = Some(Arc::clone(&logger));
    h.shop.fail_with(500, None);

    let mut page = CategoriesPage::new(h.ctx.clone());
    page.mount().await;

    let errors = logger.get_by_event(events::PAGE_ERROR, 10).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].page.as_deref(), Some("categories"));
    assert_eq!(errors[0].error_message.as_deref(), Some("Failed to fetch categories"));
}
