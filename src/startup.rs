use crate::configuration::Settings;
use crate::db;
use crate::middleware;
use crate::routes;
use crate::services::{CdnPublisher, Deployer};
use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{dev::Server, error, http, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let deployer = Deployer::new(
        Arc::new(db::PgDeploymentStore::new(pg_pool.clone())),
        Arc::new(db::PgTemplateStore::new(pg_pool.clone())),
        Arc::new(db::PgProfileProvider::new(pg_pool.clone())),
        Arc::new(CdnPublisher::new(settings.deployment.clone())),
        Arc::new(db::PgActivityRecorder::new(pg_pool.clone())),
        &settings.deployment,
    );
    let deployer = web::Data::new(deployer);
    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg: String = match err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "{{\"kind\":\"deserialize\",\"line\":{}, \"column\":{}, \"msg\":\"{}\"}}",
                err.line(),
                err.column(),
                err
            ),
            _ => format!("{{\"kind\":\"other\",\"msg\":\"{}\"}}", err),
        };
        error::InternalError::new(msg, http::StatusCode::BAD_REQUEST).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::authentication::Manager::new())
            .wrap(Compress::default())
            .wrap(Cors::permissive())
            .app_data(json_config.clone())
            .app_data(settings.clone())
            .app_data(pg_pool.clone())
            .app_data(deployer.clone())
            .service(web::scope("/health_check").service(routes::health_check::health_check))
            .service(
                web::scope("/deployment")
                    .service(routes::deployment::add::item)
                    .service(routes::deployment::get::list)
                    .service(routes::deployment::get::item)
                    .service(routes::deployment::update::item)
                    .service(routes::deployment::delete::item),
            )
            .service(
                web::scope("/template")
                    .service(routes::template::get::list)
                    .service(routes::template::get::item),
            )
            .service(web::scope("/public").service(routes::public::render::item))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
