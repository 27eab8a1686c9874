use actix_web::{get, web, App, HttpServer, Responder};
use foliohost::configuration::{get_configuration, DatabaseSettings, Settings};
use foliohost::forms;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub mod fakes;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub async fn spawn_app_with_configuration(mut configuration: Settings) -> Option<TestApp> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();

    let connection_pool = match configure_database(&configuration.database).await {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Skipping tests: failed to connect to postgres: {}", err);
            return None;
        }
    };

    let server = foliohost::startup::run(listener, connection_pool.clone(), configuration)
        .await
        .expect("Failed to bind address.");

    let _ = tokio::spawn(server);
    println!("Used Port: {}", port);

    Some(TestApp {
        address,
        db_pool: connection_pool,
    })
}

pub async fn spawn_app() -> Option<TestApp> {
    spawn_app_with(|_| {}).await
}

/// Spawn the app with the mock auth server wired in, letting the caller
/// tweak the configuration first (e.g. point `publish_url` at a mock CDN).
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> Option<TestApp> {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    customize(&mut configuration);

    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind port for testing auth server");

    configuration.auth_url = format!(
        "http://127.0.0.1:{}/me",
        listener.local_addr().unwrap().port()
    );
    println!("Auth Server is running on: {}", configuration.auth_url);

    let _ = tokio::spawn(mock_auth_server(listener));
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    spawn_app_with_configuration(configuration).await
}

pub async fn configure_database(config: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let mut connection = PgConnection::connect(&config.connection_string_without_db()).await?;

    connection
        .execute(format!(r#"CREATE DATABASE "{}""#, config.database_name).as_str())
        .await?;

    let connection_pool = PgPool::connect(&config.connection_string()).await?;

    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    Ok(connection_pool)
}

#[get("")]
async fn mock_auth() -> actix_web::Result<impl Responder> {
    let user_form = forms::UserForm {
        user: forms::user::AuthUser {
            id: "test_user_id".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test@example.com".to_string(),
            email_confirmed: true,
        },
    };

    Ok(web::Json(user_form))
}

async fn mock_auth_server(listener: TcpListener) -> actix_web::dev::Server {
    HttpServer::new(|| App::new().service(web::scope("/me").service(mock_auth)))
        .listen(listener)
        .unwrap()
        .run()
}
