use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity_provider: IdentityProviderSettings,
    pub content_api: ContentApiSettings,
    /// Protected/public path set. The site ships with content listings
    /// browsable anonymously; account routes stay behind the session gate.
    #[serde(default)]
    pub gate: GatePolicy,
    pub cookies: SessionCookieSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct IdentityProviderSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct ContentApiSettings {
    pub url: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let configuration_directory = if base_path.ends_with("consumer-site") {
        base_path.join("config")
    } else {
        base_path.join("consumer-site").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
