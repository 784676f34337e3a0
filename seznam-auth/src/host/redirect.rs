//! Redirect URI derivation.

use url::Url;

use super::{ProviderConfig, RedirectUriResolver};
use crate::error::{configuration_error, ConfigurationErrorKind, Error, ErrorKind};

/// Derives `<root_url>/_oauth/<provider>` unless the provider config names an
/// explicit redirect URI.
#[derive(Debug, Clone)]
pub struct AbsoluteUrlResolver {
    root_url: Url,
}

impl AbsoluteUrlResolver {
    pub fn new(root_url: &str) -> Result<Self, Error> {
        let mut root_url = Url::parse(root_url).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Configuration(ConfigurationErrorKind::InvalidRedirectUri),
        })?;
        // Joining relative paths replaces the last segment unless it ends with '/'.
        if !root_url.path().ends_with('/') {
            let path = format!("{}/", root_url.path());
            root_url.set_path(&path);
        }
        Ok(Self { root_url })
    }
}

impl RedirectUriResolver for AbsoluteUrlResolver {
    fn redirect_uri_for(&self, provider: &str, config: &ProviderConfig) -> Result<String, Error> {
        if let Some(redirect_uri) = &config.redirect_uri {
            return Ok(redirect_uri.clone());
        }
        self.root_url
            .join(&format!("_oauth/{}", provider))
            .map(String::from)
            .map_err(|_| {
                configuration_error(
                    ConfigurationErrorKind::InvalidRedirectUri,
                    &format!("cannot derive redirect URI for {}", provider),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::SealedSecret;

    fn config(redirect_uri: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            client_id: "c1".to_string(),
            secret: SealedSecret::Plain("s1".to_string()),
            redirect_uri: redirect_uri.map(str::to_string),
        }
    }

    #[test]
    fn test_derives_from_root_url() {
        let resolver = AbsoluteUrlResolver::new("https://app.example.com").unwrap();
        assert_eq!(
            resolver.redirect_uri_for("seznam", &config(None)).unwrap(),
            "https://app.example.com/_oauth/seznam"
        );
    }

    #[test]
    fn test_keeps_root_url_path_prefix() {
        let resolver = AbsoluteUrlResolver::new("https://example.com/app").unwrap();
        assert_eq!(
            resolver.redirect_uri_for("seznam", &config(None)).unwrap(),
            "https://example.com/app/_oauth/seznam"
        );
    }

    #[test]
    fn test_explicit_redirect_uri_wins() {
        let resolver = AbsoluteUrlResolver::new("https://app.example.com/").unwrap();
        assert_eq!(
            resolver
                .redirect_uri_for("seznam", &config(Some("https://app/cb")))
                .unwrap(),
            "https://app/cb"
        );
    }

    #[test]
    fn test_invalid_root_url() {
        assert!(AbsoluteUrlResolver::new("not a url").is_err());
    }
}
