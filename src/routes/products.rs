use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::api::{HttpCatalogClient, ProductReader};
use crate::domain::product::FilterPatch;
use crate::forms::products::{DeleteProductForm, FilterForm, PageQuery, ProductForm, SearchQuery};
use crate::routes::{base_context, redirect, render_template, session_key};
use crate::services::session::{AdminSession, SessionStore};

#[get("/")]
pub async fn show_index() -> impl Responder {
    redirect("/products")
}

#[get("/products")]
pub async fn show_products(
    params: web::Query<PageQuery>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let entry = store.entry(&session_key(&session));

    // The lock is released while the list request is in flight; a newer
    // page flip supersedes this one through its ticket.
    let ticket = {
        let mut state = entry.state().lock().await;
        if let Some(page) = params.page {
            state.products.set_page(page);
        }
        state.products.begin_fetch()
    };
    let result = client.list_products(ticket.query().clone()).await;

    let mut state = entry.state().lock().await;
    state.products.complete_fetch(ticket, result);
    render_products_page(&tera, &flash_messages, &state, client.get_ref(), None).await
}

/// Full list page, including the discount modal when it is open.
pub(crate) async fn render_products_page(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    state: &AdminSession,
    client: &HttpCatalogClient,
    discount_error: Option<String>,
) -> HttpResponse {
    let modal = if state.discount.is_open() {
        let coupons = state.discount.coupons(client).await;
        state.discount.view(coupons, discount_error)
    } else {
        None
    };

    let mut context = base_context(flash_messages, "products");
    context.insert("list", &state.products.view());
    context.insert("modal", &modal);
    render_template(tera, "products/index.html", &context)
}

#[get("/products/search")]
pub async fn search_products(
    params: web::Query<SearchQuery>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let entry = store.entry(&session_key(&session));

    let revision = entry.search().push(params.into_inner().q);
    let Some(term) = entry.search().settled(revision).await else {
        return HttpResponse::NoContent().finish();
    };

    let mut state = entry.state().lock().await;
    state.products.set_filters(FilterPatch::new().search(term));
    state.products.fetch_products(client.get_ref()).await;

    let mut context = Context::new();
    context.insert("list", &state.products.view());
    render_template(&tera, "products/_results.html", &context)
}

#[post("/products/filters")]
pub async fn apply_filters(
    session: Session,
    store: web::Data<SessionStore>,
    web::Form(form): web::Form<FilterForm>,
) -> impl Responder {
    match form.into_patch() {
        Ok(patch) => {
            let entry = store.entry(&session_key(&session));
            entry.state().lock().await.products.set_filters(patch);
        }
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }
    redirect("/products")
}

#[post("/products/filters/clear")]
pub async fn clear_filters(session: Session, store: web::Data<SessionStore>) -> impl Responder {
    let entry = store.entry(&session_key(&session));
    entry
        .state()
        .lock()
        .await
        .products
        .set_filters(FilterPatch::clear_price_range());
    redirect("/products")
}

#[get("/products/new")]
pub async fn new_product(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_product_form(&tera, &flash_messages, &ProductForm::default(), None, None)
}

#[get("/products/{id:\\d+}/edit")]
pub async fn edit_product(
    path: web::Path<i64>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = path.into_inner();
    let entry = store.entry(&session_key(&session));
    let state = entry.state().lock().await;

    match state.products.get_by_id(client.get_ref(), product_id).await {
        Ok(product) => render_product_form(
            &tera,
            &flash_messages,
            &ProductForm::from_product(&product),
            Some(product_id),
            None,
        ),
        Err(err) => {
            FlashMessage::error(err.message()).send();
            redirect("/products")
        }
    }
}

#[post("/products")]
pub async fn create_product(
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    save_product(&session, &store, &client, &flash_messages, &tera, form, None).await
}

#[post("/products/{id:\\d+}")]
pub async fn update_product(
    path: web::Path<i64>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();
    save_product(
        &session,
        &store,
        &client,
        &flash_messages,
        &tera,
        form,
        Some(product_id),
    )
    .await
}

async fn save_product(
    session: &Session,
    store: &SessionStore,
    client: &HttpCatalogClient,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
    form: ProductForm,
    editing_id: Option<i64>,
) -> HttpResponse {
    let draft = match form.clone().into_new_product() {
        Ok(draft) => draft,
        Err(err) => {
            let message = Some(err.to_string());
            return render_product_form(tera, flash_messages, &form, editing_id, message);
        }
    };

    let entry = store.entry(&session_key(session));
    let mut state = entry.state().lock().await;

    match state.products.save(client, draft, editing_id).await {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" saved.", product.name)).send();
            redirect("/products")
        }
        Err(err) => render_product_form(
            tera,
            flash_messages,
            &form,
            editing_id,
            Some(err.message().to_string()),
        ),
    }
}

/// The form is in edit mode exactly when `editing_id` is set.
fn render_product_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    form: &ProductForm,
    editing_id: Option<i64>,
    error: Option<String>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "products");
    context.insert("form", form);
    context.insert("editing_id", &editing_id);
    context.insert("error", &error);
    render_template(tera, "products/form.html", &context)
}

#[post("/products/{id:\\d+}/delete")]
pub async fn delete_product(
    path: web::Path<i64>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    web::Form(form): web::Form<DeleteProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();
    let entry = store.entry(&session_key(&session));
    let mut state = entry.state().lock().await;

    let confirmed = form.confirmed;
    if state
        .products
        .delete_by_id(client.get_ref(), product_id, |_| confirmed)
        .await
    {
        FlashMessage::success("Product deleted.").send();
    }
    redirect("/products")
}
