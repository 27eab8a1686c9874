use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub auth_url: String,
    pub deployment: DeploymentSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DeploymentSettings {
    /// Domain the slug becomes a subdomain of, e.g. `folio.host`
    /// gives `https://<slug>.folio.host`.
    pub base_domain: String,
    /// Endpoint of the publishing platform the rendered document is pushed to.
    pub publish_url: String,
    /// Hard ceiling on a single publish call, in seconds.
    pub publish_timeout_seconds: u64,
    /// Bound on the slug suffix search before giving up.
    #[serde(default = "default_slug_attempts")]
    pub max_slug_attempts: u32,
}

fn default_slug_attempts() -> u32 {
    10_000
}

impl DeploymentSettings {
    pub fn public_url(&self, slug: &str) -> String {
        format!("https://{}.{}", slug, self.base_domain)
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = config::Config::default();

    // Add configuration values from a file named `configuration`
    // with the .yaml extension
    settings.merge(config::File::with_name("configuration"))?; // .json, .toml, .yaml, .yml

    settings.try_deserialize()
}
