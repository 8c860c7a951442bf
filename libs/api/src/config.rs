use anyhow::Context;
use repository::session::SessionConfig;
use toml::{map::Map, Value};
use util::{get_integer, get_str, load_config};

#[derive(Clone, Debug)]
pub struct Config {
    pub server: Server,
    pub session: SessionConfig,
    pub supabase: Supabase,
}

#[derive(Clone, Debug)]
pub struct Server {
    /// Public origin of this service, used to build the OAuth callback URL.
    pub site_url: String,
    pub port: u16,
    pub allowed_origin: String,
}

#[derive(Clone, Debug)]
pub struct Supabase {
    pub table: String,
    pub bucket: String,
}

impl Config {
    /// Reads `Config.<name>.toml` style files from the workspace root.
    pub fn load(config_name: &str) -> anyhow::Result<Self> {
        let config = load_config(config_name)?;
        Self::from_toml(&config)
            .with_context(|| format!("invalid config {}", config_name))
    }

    pub fn from_toml(config: &Map<String, Value>) -> anyhow::Result<Self> {
        let site_url = get_str(config, "server", "site_url")?
            .trim_end_matches('/')
            .to_string();
        let port = u16::try_from(get_integer(config, "server", "port")?)
            .context("server.port is out of range")?;

        let server = Server {
            port,
            allowed_origin: get_str(config, "server", "allowed_origin")?,
            site_url,
        };

        let session = SessionConfig {
            cookie_name: get_str(config, "session", "cookie_name")?,
            max_age_secs: get_integer(config, "session", "max_age_secs")?,
            secure: server.site_url.starts_with("https://"),
        };

        let supabase = Supabase {
            table: get_str(config, "supabase", "table")?,
            bucket: get_str(config, "supabase", "bucket")?,
        };

        Ok(Self {
            server,
            session,
            supabase,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CONFIG: &str = r#"
[server]
site_url = "https://prompts.example.com/"
port = 8000
allowed_origin = "https://prompts.example.com"

[session]
cookie_name = "sb-auth-token"
max_age_secs = 604800

[supabase]
table = "prompts"
bucket = "prompt-images"
"#;

    #[test]
    fn test_from_toml() {
        // Arrange
        let config = toml::from_str::<Map<String, Value>>(CONFIG).unwrap();

        // Act
        let config = Config::from_toml(&config).unwrap();

        // Assert
        assert_eq!(config.server.site_url, "https://prompts.example.com");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.session.cookie_name, "sb-auth-token");
        assert_eq!(config.session.max_age_secs, 604800);
        assert!(config.session.secure);
        assert_eq!(config.supabase.table, "prompts");
        assert_eq!(config.supabase.bucket, "prompt-images");
    }

    #[test]
    fn test_from_toml_rejects_bad_port() {
        // Arrange
        let text = CONFIG.replace("port = 8000", "port = 70000");
        let config = toml::from_str::<Map<String, Value>>(&text).unwrap();

        // Act
        let result = Config::from_toml(&config);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_missing_table() {
        // Arrange
        let text = CONFIG.replace("[supabase]", "[storage]");
        let config = toml::from_str::<Map<String, Value>>(&text).unwrap();

        // Act
        let result = Config::from_toml(&config);

        // Assert
        assert!(result.is_err());
    }
}
