use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use seznam_auth::oauth::{TOKEN_URL, USER_URL};

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Absolute URL the application is reachable at. OAuth redirect URIs are
    /// derived from it as `<root_url>/_oauth/<provider>`.
    #[arg(long, env, default_value = "http://localhost:4000")]
    root_url: String,

    /// The OAuth client ID registered with Seznam.
    #[arg(long, env)]
    seznam_client_id: Option<String>,

    /// The OAuth client secret registered with Seznam.
    #[arg(long, env, hide_env_values = true)]
    seznam_client_secret: Option<String>,

    /// Explicit redirect URI registered with Seznam. Overrides the one derived from `root_url`.
    #[arg(long, env)]
    seznam_redirect_uri: Option<String>,

    /// The Seznam token endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = TOKEN_URL)]
    seznam_token_url: String,

    /// The Seznam user-info endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = USER_URL)]
    seznam_user_url: String,

    /// Timeout in seconds for each request to the identity provider
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Hex-encoded 32-byte key used to seal secrets handed to storage.
    /// When unset, secrets are stored unsealed.
    #[arg(long, env, hide_env_values = true)]
    secret_encryption_key: Option<String>,

    /// Seconds a completed login waits to be collected by the login popup's opener
    #[arg(long, env, default_value_t = 600)]
    pub credential_ttl_secs: i64,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn seznam_client_id(&self) -> Option<String> {
        self.seznam_client_id.clone()
    }

    pub fn seznam_client_secret(&self) -> Option<String> {
        self.seznam_client_secret.clone()
    }

    pub fn seznam_redirect_uri(&self) -> Option<String> {
        self.seznam_redirect_uri.clone()
    }

    /// Returns the Seznam token endpoint URL.
    pub fn seznam_token_url(&self) -> &str {
        &self.seznam_token_url
    }

    /// Returns the Seznam user-info endpoint URL.
    pub fn seznam_user_url(&self) -> &str {
        &self.seznam_user_url
    }

    pub fn secret_encryption_key(&self) -> Option<String> {
        self.secret_encryption_key.clone()
    }

    pub fn set_seznam_endpoints(mut self, token_url: String, user_url: String) -> Self {
        self.seznam_token_url = token_url;
        self.seznam_user_url = user_url;
        self
    }

    pub fn set_seznam_credentials(mut self, client_id: String, client_secret: String) -> Self {
        self.seznam_client_id = Some(client_id);
        self.seznam_client_secret = Some(client_secret);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_seznam() {
        let config = Config::try_parse_from(["seznam_login"]).unwrap();
        assert_eq!(config.seznam_token_url(), "https://login.szn.cz/api/v1/oauth/token");
        assert_eq!(config.seznam_user_url(), "https://login.szn.cz/api/v1/user");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.credential_ttl_secs, 600);
    }

    #[test]
    fn test_log_level_parses_from_flag() {
        let config =
            Config::try_parse_from(["seznam_login", "--log-level-filter", "DEBUG"]).unwrap();
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Config::try_parse_from(["seznam_login", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_setters_override_endpoints_and_credentials() {
        let config = Config::try_parse_from(["seznam_login"])
            .unwrap()
            .set_seznam_endpoints(
                "http://127.0.0.1:1/token".to_string(),
                "http://127.0.0.1:1/user".to_string(),
            )
            .set_seznam_credentials("c1".to_string(), "s1".to_string());
        assert_eq!(config.seznam_token_url(), "http://127.0.0.1:1/token");
        assert_eq!(config.seznam_client_id(), Some("c1".to_string()));
        assert_eq!(config.seznam_client_secret(), Some("s1".to_string()));
    }
}
