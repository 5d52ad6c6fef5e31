use actix_session::Session;
use actix_web::{HttpResponse, web};
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};
use uuid::Uuid;

pub mod discounts;
pub mod products;

/// Register every page handler. Literal paths come before the `{id}` ones.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(products::show_index)
        .service(products::search_products)
        .service(products::apply_filters)
        .service(products::clear_filters)
        .service(products::new_product)
        .service(products::show_products)
        .service(products::create_product)
        .service(products::edit_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(discounts::open_discount)
        .service(discounts::close_discount)
        .service(discounts::apply_coupon)
        .service(discounts::apply_percentage)
        .service(discounts::remove_discount);
}

/// Cookie-session key holding the id of the server-side view state.
const VIEW_ID_KEY: &str = "view_id";

#[derive(Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

/// Context shared by every page: flash alerts and the active menu entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_class(message.level()),
            message: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

fn alert_class(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Id of the view state for this browser, minted on first visit.
pub fn session_key(session: &Session) -> String {
    match session.get::<String>(VIEW_ID_KEY) {
        Ok(Some(id)) => id,
        Ok(None) | Err(_) => {
            let id = Uuid::new_v4().to_string();
            if let Err(err) = session.insert(VIEW_ID_KEY, &id) {
                log::warn!("Failed to store view id in session: {err}");
            }
            id
        }
    }
}
