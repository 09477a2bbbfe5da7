use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the assistant backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// User id sent to the backend
    #[arg(long, env = "CHAT_USER_ID")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub identity: IdentityConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Script URL for htmx; the UI degrades to plain form posts without it.
    pub htmx_src: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Send route, `/api/chat` on current backends.
    pub chat_path: String,
    /// Connect timeout in seconds; `0` keeps the HTTP client default.
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    pub user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.static_dir", "static")?
            .set_default("server.htmx_src", "/static/vendor/htmx-2.0.8.min.js")?
            .set_default("backend.base_url", "http://localhost:8000")?
            .set_default("backend.chat_path", crate::api::DEFAULT_CHAT_PATH)?
            .set_default("backend.connect_timeout_secs", 0)?
            .set_default("identity.user_id", "user123")?
            .set_default(
                "session.idle_timeout_secs",
                crate::session::DEFAULT_SESSION_TIMEOUT.as_secs(),
            )?
            .set_default("session.sweep_interval_secs", 60)?;

        // 2. Config file: explicit path, else ./config.yaml when present
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None if Path::new("config.yaml").exists() => {
                builder.add_source(File::with_name("config.yaml"))
            }
            None => builder,
        };

        // 3. Environment variables (prefixed with CHAT_), e.g. CHAT_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their plain env fallbacks) win over everything
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(user_id) = cli.user_id {
            builder = builder.set_override("identity.user_id", user_id)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Socket address string the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
