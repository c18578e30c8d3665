//! Server settings loaded via OrthoConfig and the assembled server
//! configuration object.
//!
//! [`AppSettings`] is the raw layered configuration (CLI, environment,
//! file). [`ServerConfig`] is the validated form the server builds from:
//! fixtures are loaded, the media signing settings are checked, and the
//! secret store adapter is chosen. Anything wrong surfaces at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::domain::media::{MediaConfigError, MediaSigningConfig};
use crate::domain::ports::SecretStore;
use crate::domain::{Enrollment, MeetupFixtureError, RecurringMeetup};
use crate::outbound::persistence::{DbPool, FixtureLessonCatalog};
use crate::outbound::secrets::{FileSecretStore, HttpSecretStore};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

fn default_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Layered application settings; env vars use the `STUDYHALL_` prefix.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STUDYHALL")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = "0.0.0.0:8080".to_string())]
    pub bind_addr: String,
    /// PostgreSQL connection URL; absent means fixture mode with in-memory
    /// stores.
    pub database_url: Option<String>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Whether session cookies carry the `Secure` attribute.
    #[ortho_config(default = true, skip_cli)]
    pub session_cookie_secure: bool,
    /// Content-delivery domain media URLs are signed for.
    pub media_domain: String,
    /// Key pair identifier registered at the content-delivery edge.
    pub media_key_pair_id: String,
    /// Secret store name of the RSA signing key.
    #[ortho_config(default = "media-signing-key".to_string())]
    pub media_secret_name: String,
    /// Base URL of the HTTP secret manager.
    pub secret_store_url: Option<String>,
    /// Directory of mounted secret files, used when no store URL is set.
    pub secrets_dir: Option<PathBuf>,
    /// Course catalog fixture path override.
    pub course_fixture: Option<PathBuf>,
    /// Meetup roster fixture path override.
    pub meetup_fixture: Option<PathBuf>,
    /// Enrollment seed fixture, honoured in fixture mode only.
    pub enrollment_fixture: Option<PathBuf>,
    /// Stream URL lifetime handed to the credential issuer, in minutes.
    #[ortho_config(default = 10)]
    pub default_expiry_minutes: u32,
}

/// Errors raised while turning settings into a runnable configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as a socket address.
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        /// The rejected value.
        value: String,
        /// The parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Media signing settings failed validation.
    #[error(transparent)]
    Media(#[from] MediaConfigError),
    /// The secret store URL does not parse.
    #[error("invalid secret store URL {value}")]
    SecretStoreUrl {
        /// The rejected value.
        value: String,
    },
    /// The HTTP secret store client could not be built.
    #[error("failed to build secret store client: {0}")]
    SecretStoreClient(#[from] reqwest::Error),
    /// Neither a secret store URL nor a secrets directory is configured.
    #[error("no secret store configured: set a store URL or a secrets directory")]
    NoSecretStore,
    /// The session key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    SessionKey {
        /// The configured key path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The meetup fixture failed to load.
    #[error(transparent)]
    MeetupFixture(#[from] MeetupFixtureError),
    /// A fixture file failed to load or parse.
    #[error("failed to load fixture {path}: {message}")]
    Fixture {
        /// The fixture path.
        path: String,
        /// The load failure detail.
        message: String,
    },
}

impl AppSettings {
    /// Parse the configured bind address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Validate the media signing settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::Media`] when the domain or identifiers are
    /// invalid.
    pub fn media_config(&self) -> Result<MediaSigningConfig, SettingsError> {
        Ok(MediaSigningConfig::new(
            &self.media_domain,
            self.media_key_pair_id.clone(),
            self.media_secret_name.clone(),
        )?)
    }

    /// Build the secret store adapter: the HTTP manager when a URL is set,
    /// otherwise the directory store.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when neither source is configured or the
    /// HTTP client cannot be built.
    pub fn secret_store(&self) -> Result<Arc<dyn SecretStore>, SettingsError> {
        if let Some(raw) = &self.secret_store_url {
            let url = Url::parse(raw).map_err(|_| SettingsError::SecretStoreUrl {
                value: raw.clone(),
            })?;
            return Ok(Arc::new(HttpSecretStore::new(url)?));
        }
        if let Some(dir) = &self.secrets_dir {
            return Ok(Arc::new(FileSecretStore::new(dir)));
        }
        Err(SettingsError::NoSecretStore)
    }

    /// Load the session key from the configured file.
    ///
    /// Falls back to an ephemeral key in debug builds so local development
    /// works without provisioning; release builds fail instead of serving
    /// sessions that die with the process.
    ///
    /// # Errors
    /// Returns [`SettingsError::SessionKey`] when the file is unreadable in
    /// a release build.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self
            .session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("/var/run/secrets/session_key"));
        match std::fs::read(&path) {
            Ok(bytes) => {
                let fingerprint = hex::encode(&Sha256::digest(&bytes)[..8]);
                info!(path = %path.display(), fingerprint, "session key loaded");
                Ok(Key::derive_from(&bytes))
            }
            Err(source) if cfg!(debug_assertions) => {
                warn!(path = %path.display(), error = %source, "using ephemeral session key (dev only)");
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::SessionKey {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn course_fixture_path(&self) -> PathBuf {
        self.course_fixture
            .clone()
            .unwrap_or_else(|| default_fixture("courses.json"))
    }

    fn meetup_fixture_path(&self) -> PathBuf {
        self.meetup_fixture
            .clone()
            .unwrap_or_else(|| default_fixture("meetups.json"))
    }
}

fn load_enrollment_seed(path: &Path) -> Result<Vec<Enrollment>, SettingsError> {
    let raw = std::fs::read_to_string(path).map_err(|err| SettingsError::Fixture {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| SettingsError::Fixture {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Validated configuration the server is built from.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) media: MediaSigningConfig,
    pub(crate) secrets: Arc<dyn SecretStore>,
    pub(crate) catalog: Arc<FixtureLessonCatalog>,
    pub(crate) meetups: Vec<RecurringMeetup>,
    pub(crate) enrollment_seed: Vec<Enrollment>,
    pub(crate) default_expiry_minutes: u32,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Assemble a configuration from loaded settings, validating every
    /// piece and loading fixtures up front.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for any invalid setting or unloadable
    /// fixture.
    pub fn from_settings(settings: &AppSettings, key: Key) -> Result<Self, SettingsError> {
        let catalog_path = settings.course_fixture_path();
        let catalog =
            FixtureLessonCatalog::load_fixture(&catalog_path).map_err(|err| {
                SettingsError::Fixture {
                    path: catalog_path.display().to_string(),
                    message: err.to_string(),
                }
            })?;
        let meetups = RecurringMeetup::load_fixture(&settings.meetup_fixture_path())?;
        let enrollment_seed = match (&settings.database_url, &settings.enrollment_fixture) {
            (None, Some(path)) => load_enrollment_seed(path)?,
            _ => Vec::new(),
        };

        Ok(Self {
            key,
            cookie_secure: settings.session_cookie_secure,
            same_site: SameSite::Lax,
            bind_addr: settings.bind_addr()?,
            media: settings.media_config()?,
            secrets: settings.secret_store()?,
            catalog: Arc::new(catalog),
            meetups,
            enrollment_seed,
            default_expiry_minutes: settings.default_expiry_minutes,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        })
    }

    /// Attach a database connection pool for the Diesel-backed adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing and validation coverage.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_settings(extra: &[(&str, Option<String>)]) -> AppSettings {
        let mut vars: Vec<(&str, Option<String>)> = vec![
            ("STUDYHALL_BIND_ADDR", None),
            ("STUDYHALL_DATABASE_URL", None),
            ("STUDYHALL_MEDIA_DOMAIN", Some("https://media.example".into())),
            ("STUDYHALL_MEDIA_KEY_PAIR_ID", Some("KEYID123".into())),
            ("STUDYHALL_MEDIA_SECRET_NAME", None),
            ("STUDYHALL_SECRET_STORE_URL", None),
            ("STUDYHALL_SECRETS_DIR", None),
            ("STUDYHALL_DEFAULT_EXPIRY_MINUTES", None),
        ];
        vars.extend_from_slice(extra);
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("studyhall-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_settings(&[]);
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.media_secret_name, "media-signing-key");
        assert_eq!(settings.default_expiry_minutes, 10);
        assert!(settings.session_cookie_secure);
        assert!(settings.database_url.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_settings(&[
            ("STUDYHALL_BIND_ADDR", Some("127.0.0.1:9000".into())),
            ("STUDYHALL_DEFAULT_EXPIRY_MINUTES", Some("30".into())),
        ]);
        assert_eq!(
            settings.bind_addr().expect("valid addr"),
            "127.0.0.1:9000".parse().expect("socket addr")
        );
        assert_eq!(settings.default_expiry_minutes, 30);
    }

    #[rstest]
    fn invalid_bind_address_is_rejected() {
        let settings = load_settings(&[("STUDYHALL_BIND_ADDR", Some("not-an-addr".into()))]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn secret_store_requires_a_source() {
        let settings = load_settings(&[]);
        assert!(matches!(
            settings.secret_store(),
            Err(SettingsError::NoSecretStore)
        ));
    }

    #[rstest]
    fn directory_store_is_used_when_no_url_is_set() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = load_settings(&[(
            "STUDYHALL_SECRETS_DIR",
            Some(dir.path().display().to_string()),
        )]);
        assert!(settings.secret_store().is_ok());
    }
}
