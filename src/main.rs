use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use catalog_admin::api::HttpCatalogClient;
use catalog_admin::config::ServerConfig;
use catalog_admin::routes;
use catalog_admin::services::session::SessionStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();
    let secret_key = config.secret_key();

    let client = match HttpCatalogClient::new(config.api_url.clone(), config.api_timeout) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build catalog API client: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Using catalog API at {}", client.base_url());

    let sessions = SessionStore::new(config.session_settings());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let address = config.address.clone();
    let port = config.port;

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(sessions.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
