use gate_core::session::SessionCookieSettings;
use gate_core::verdict::GatePolicy;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity_provider: IdentityProviderSettings,
    pub content_api: ContentApiSettings,
    /// Protected/public path set for the edge gate. The admin panel
    /// protects everything outside the auth prefix by default.
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
    /// OTLP collector endpoint; omit to log without span export.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct IdentityProviderSettings {
    /// Base URL of the external identity service.
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct ContentApiSettings {
    /// Base URL of the backend content API.
    pub url: String,
    /// Bearer credential for the backend; the proxy attaches it, nothing
    /// else in this subsystem reads it.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    let configuration_directory = if base_path.ends_with("admin-panel") {
        base_path.join("config")
    } else {
        base_path.join("admin-panel").join("config")
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
