use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub renderer: RendererSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_max_body_bytes() -> usize { 64 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: Option<String>,
    pub service_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_people_table")]
    pub people_table: String,
    #[serde(default = "default_scores_view")]
    pub scores_view: String,
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            timeout_secs: default_timeout_secs(),
            people_table: default_people_table(),
            scores_view: default_scores_view(),
        }
    }
}

impl SupabaseSettings {
    /// Both the endpoint and the service key are present and non-empty
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.url) && present(&self.service_key)
    }
}

fn default_timeout_secs() -> u64 { 30 }
fn default_people_table() -> String { "project_people".to_string() }
fn default_scores_view() -> String { "v_kompas_series".to_string() }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RendererSettings {
    /// Chromium/Chrome binary; auto-detected when unset
    pub chrome_executable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin_page")]
    pub page_path: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            page_path: default_admin_page(),
        }
    }
}

fn default_admin_page() -> String { "admin.html".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with KOMPAS__)
    /// 5. SUPABASE_URL / SUPABASE_SERVICE_KEY (or SUPABASE_SERVICE_ROLE_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KOMPAS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("KOMPAS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_supabase_env(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

/// Override the Supabase credentials with the conventional variable names
///
/// SUPABASE_SERVICE_ROLE_KEY is only consulted when SUPABASE_SERVICE_KEY is unset.
fn apply_supabase_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("SUPABASE_URL");
    let service_key = lookup("SUPABASE_SERVICE_KEY").or_else(|| lookup("SUPABASE_SERVICE_ROLE_KEY"));

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = url {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Some(key) = service_key {
        builder = builder.set_override("supabase.service_key", key)?;
    }

    builder.build()
}
