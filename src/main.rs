use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod core;
mod db;
mod docs;
mod error;
mod jobs;
mod model;
mod notify;
mod policy;
mod routes;
mod store;

use config::Config;
use db::init_db;

use crate::api::AppService;
use crate::core::clock::SystemClock;
use crate::core::service::AttendanceService;
use crate::docs::ApiDoc;
use crate::notify::DbNotifier;
use crate::policy::PolicyHandle;
use crate::store::mysql::MySqlStore;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Worktrack attendance service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;
    let store = MySqlStore::new(pool.clone());

    let policy = PolicyHandle::new(config.time_policy());
    match store.load_holidays().await {
        Ok(holidays) => policy.replace_holidays(holidays),
        // Served with an empty calendar until the next holiday change
        // reloads it.
        Err(e) => warn!(error = %e, "failed to load holiday calendar at boot"),
    }

    let service: AppService = AttendanceService::new(
        store.clone(),
        SystemClock,
        policy.clone(),
        config.location_policy(),
    );

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    {
        let store = store.clone();
        let policy = policy.clone();
        let at = config.forced_checkout_at;
        actix_web::rt::spawn(async move {
            jobs::run_daily("forced-checkout", at, policy.clone(), || {
                let store = store.clone();
                let policy = policy.clone();
                async move {
                    jobs::forced_checkout::run(&store, &SystemClock, &policy.current()).await
                }
            })
            .await;
        });
    }

    {
        let store = store.clone();
        let policy = policy.clone();
        let notifier = DbNotifier::new(pool.clone());
        let at = config.daily_report_at;
        actix_web::rt::spawn(async move {
            jobs::run_daily("daily-report", at, policy.clone(), || {
                let store = store.clone();
                let policy = policy.clone();
                let notifier = notifier.clone();
                async move {
                    jobs::daily_report::run(&store, &SystemClock, &policy.current(), &notifier)
                        .await
                }
            })
            .await;
        });
    }

    let service_data = Data::new(service);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(policy.clone()))
            .app_data(service_data.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
