//! Endpoint configuration.
//!
//! Values come from the process environment with fixed fallbacks:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `MEDICAL_API_URL` / `API_URL` | base URL (first one set wins) | `https://localhost:8443/ords/medical_sys_api` |
//! | `API_RESOURCE_PATH` | path below the base URL | `basic_sec_api/basic_sec_view_r_profile_patient` |
//! | `SSL_VERIFY` | verify TLS certificates | `true` |
//! | `API_TIMEOUT` | request timeout in seconds | `10` |
//! | `API_USERNAME` / `API_PASSWORD` | HTTP basic auth | unset |

use std::fmt;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::id::PatientId;

pub const DEFAULT_BASE_URL: &str = "https://localhost:8443/ords/medical_sys_api";
pub const DEFAULT_RESOURCE_PATH: &str = "basic_sec_api/basic_sec_view_r_profile_patient";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Basic-auth credential pair. The password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Raw view of the environment, before defaults are resolved.
#[derive(Deserialize)]
struct EnvSettings {
    medical_api_url: Option<String>,
    api_url: Option<String>,
    api_resource_path: String,
    ssl_verify: bool,
    api_timeout: u64,
    api_username: Option<String>,
    api_password: Option<String>,
}

/// Where and how patient profiles are fetched.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    base_url: Url,
    resource_path: String,
    timeout: Duration,
    verify_tls: bool,
    credentials: Option<Credentials>,
}

impl EndpointConfig {
    /// Configuration for `base_url` with every other setting at its default.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            credentials: None,
        })
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    /// Build the configuration from an explicit set of variables, ignoring
    /// the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Environment::default().source(Some(map)))
    }

    fn load(env: Environment) -> Result<Self> {
        let settings: EnvSettings = Config::builder()
            .set_default("api_resource_path", DEFAULT_RESOURCE_PATH)
            .and_then(|b| b.set_default("ssl_verify", true))
            .and_then(|b| b.set_default("api_timeout", DEFAULT_TIMEOUT_SECS as i64))
            .map_err(|e| Error::configuration(format!("config defaults: {e}")))?
            .add_source(env.ignore_empty(true))
            .build()
            .map_err(|e| Error::configuration(format!("config build error: {e}")))?
            .try_deserialize()
            .map_err(|e| Error::configuration(format!("config deserialize error: {e}")))?;

        let base_url = settings
            .medical_api_url
            .or(settings.api_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let credentials = settings
            .api_username
            .map(|username| Credentials::new(username, settings.api_password.unwrap_or_default()));

        let cfg = Self::new(&base_url)?
            .with_resource_path(&settings.api_resource_path)
            .with_timeout(Duration::from_secs(settings.api_timeout))?
            .with_verify_tls(settings.ssl_verify)
            .with_credentials(credentials);
        Ok(cfg)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_resource_path(mut self, path: &str) -> Self {
        self.resource_path = path.trim_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::configuration("timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// The collection URL patients are looked up under (no identifier).
    pub fn endpoint(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if self.resource_path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{}", self.resource_path)
        }
    }

    /// Full URL for one patient. The identifier is appended as a single
    /// percent-encoded path segment.
    pub fn patient_url(&self, id: &PatientId) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::configuration(format!("base URL {} cannot have a path", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(self.resource_path.split('/').filter(|s| !s.is_empty()))
                .push(id.as_str());
        }
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::configuration(format!("invalid base URL \"{raw}\": {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "base URL must use http or https, got \"{}\"",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdPolicy;

    fn no_vars() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let cfg = EndpointConfig::from_vars(no_vars()).unwrap();
        assert_eq!(cfg.base_url().as_str(), "https://localhost:8443/ords/medical_sys_api");
        assert_eq!(cfg.resource_path(), DEFAULT_RESOURCE_PATH);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.verify_tls());
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn test_medical_api_url_wins_over_api_url() {
        let cfg = EndpointConfig::from_vars([
            ("API_URL", "http://fallback:8080/ords/x"),
            ("MEDICAL_API_URL", "http://primary:8080/ords/y"),
        ])
        .unwrap();
        assert_eq!(cfg.base_url().host_str(), Some("primary"));

        let cfg = EndpointConfig::from_vars([("API_URL", "http://fallback:8080/ords/x")]).unwrap();
        assert_eq!(cfg.base_url().host_str(), Some("fallback"));
    }

    #[test]
    fn test_ssl_verify_and_timeout_parsing() {
        let cfg =
            EndpointConfig::from_vars([("SSL_VERIFY", "false"), ("API_TIMEOUT", "30")]).unwrap();
        assert!(!cfg.verify_tls());
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_credentials_require_username() {
        let cfg = EndpointConfig::from_vars([("API_PASSWORD", "secret")]).unwrap();
        assert!(cfg.credentials().is_none());

        let cfg = EndpointConfig::from_vars([("API_USERNAME", "alice"), ("API_PASSWORD", "0123")])
            .unwrap();
        assert_eq!(cfg.credentials(), Some(&Credentials::new("alice", "0123")));

        let cfg = EndpointConfig::from_vars([("API_USERNAME", "bob")]).unwrap();
        assert_eq!(cfg.credentials().map(|c| c.password.as_str()), Some(""));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let err = EndpointConfig::from_vars([("API_URL", "not a url")]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let err = EndpointConfig::from_vars([("API_URL", "ftp://host/x")]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let err = EndpointConfig::from_vars([("API_TIMEOUT", "soon")]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let err = EndpointConfig::from_vars([("API_TIMEOUT", "0")]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_patient_url() {
        let cfg = EndpointConfig::new(DEFAULT_BASE_URL).unwrap();
        let id = PatientId::parse("42", IdPolicy::Strict).unwrap();
        assert_eq!(
            cfg.patient_url(&id).unwrap().as_str(),
            "https://localhost:8443/ords/medical_sys_api/basic_sec_api/basic_sec_view_r_profile_patient/42"
        );
    }

    #[test]
    fn test_patient_url_with_trailing_slash_and_lenient_id() {
        let cfg = EndpointConfig::new("http://localhost:8080/ords/api/")
            .unwrap()
            .with_resource_path("/patients/");
        let id = PatientId::parse("a/b c", IdPolicy::Lenient).unwrap();
        assert_eq!(
            cfg.patient_url(&id).unwrap().as_str(),
            "http://localhost:8080/ords/api/patients/a%2Fb%20c"
        );
        assert_eq!(cfg.endpoint(), "http://localhost:8080/ords/api/patients");
    }
}
