use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpCatalogClient;
use crate::forms::discounts::{CouponForm, PercentageForm};
use crate::routes::products::render_products_page;
use crate::routes::{redirect, session_key};
use crate::services::ServiceResult;
use crate::services::discounts::DiscountOutcome;
use crate::services::session::{AdminSession, SessionStore};

#[get("/products/{id:\\d+}/discount")]
pub async fn open_discount(
    path: web::Path<i64>,
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
) -> impl Responder {
    let product_id = path.into_inner();
    let entry = store.entry(&session_key(&session));
    let mut state = entry.state().lock().await;

    if let Err(err) = state.open_discount(client.get_ref(), product_id).await {
        FlashMessage::error(err.message()).send();
    }
    redirect("/products")
}

#[post("/discount/close")]
pub async fn close_discount(session: Session, store: web::Data<SessionStore>) -> impl Responder {
    let entry = store.entry(&session_key(&session));
    entry.state().lock().await.discount.close();
    redirect("/products")
}

#[post("/discount/coupon")]
pub async fn apply_coupon(
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CouponForm>,
) -> impl Responder {
    let entry = store.entry(&session_key(&session));
    let mut state = entry.state().lock().await;

    let outcome = match form.into_code() {
        Ok(code) => state.apply_coupon(client.get_ref(), &code).await,
        Err(err) => {
            let message = err.to_string();
            return render_products_page(&tera, &flash_messages, &state, &client, Some(message))
                .await;
        }
    };

    respond(&tera, &flash_messages, &state, &client, outcome, "Coupon applied.").await
}

#[post("/discount/percent")]
pub async fn apply_percentage(
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<PercentageForm>,
) -> impl Responder {
    let entry = store.entry(&session_key(&session));
    let mut state = entry.state().lock().await;

    let outcome = match form.into_percentage() {
        Ok(percentage) => state.apply_percentage(client.get_ref(), percentage).await,
        Err(err) => {
            let message = err.to_string();
            return render_products_page(&tera, &flash_messages, &state, &client, Some(message))
                .await;
        }
    };

    respond(&tera, &flash_messages, &state, &client, outcome, "Discount applied.").await
}

#[post("/discount/remove")]
pub async fn remove_discount(
    session: Session,
    store: web::Data<SessionStore>,
    client: web::Data<HttpCatalogClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let entry = store.entry(&session_key(&session));
    let mut state = entry.state().lock().await;

    let outcome = state.remove_discount(client.get_ref()).await;
    respond(&tera, &flash_messages, &state, &client, outcome, "Discount removed.").await
}

/// Success redirects back to the list; failure keeps the modal open with
/// the message inline.
async fn respond(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    state: &AdminSession,
    client: &HttpCatalogClient,
    outcome: ServiceResult<DiscountOutcome>,
    success: &str,
) -> HttpResponse {
    match outcome {
        Ok(DiscountOutcome::Applied) => {
            FlashMessage::success(success).send();
            redirect("/products")
        }
        Ok(DiscountOutcome::NoTarget) => redirect("/products"),
        Err(err) => {
            let message = Some(err.message().to_string());
            render_products_page(tera, flash_messages, state, client, message).await
        }
    }
}
