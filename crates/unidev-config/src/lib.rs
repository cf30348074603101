//! Configuration for unidev.
//!
//! Settings are read once at startup from, in increasing precedence:
//! built-in defaults, an optional TOML file, and `UNIFI_*` environment
//! variables. The result is a plain [`Settings`] value that the binary
//! hands to the API client; nothing downstream reads the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use unidev_api::{Credentials, TlsMode, TransportConfig};

/// Prefix shared by every environment variable this crate reads.
pub const ENV_PREFIX: &str = "UNIFI_";

pub const ENV_HOST: &str = "UNIFI_HOST";
pub const ENV_TOKEN: &str = "UNIFI_TOKEN";
pub const ENV_SITE_ID: &str = "UNIFI_SITE_ID";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "UNIFI_ACCEPT_INVALID_CERTS";

/// Opaque string settings. Their environment values are taken verbatim,
/// never typed by figment's env parser (`42`, `true`, `007` stay strings).
const STRING_KEYS: [&str; 3] = ["host", "token", "site_id"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is not configured ({env} is not set)")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything needed to list the devices of one site.
///
/// Missing strings stay empty here; [`Settings::validate`] turns them
/// into [`ConfigError::Missing`].
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Controller address without scheme, e.g. `192.168.1.1`.
    #[serde(deserialize_with = "opaque_string")]
    pub host: String,

    /// Integration API key.
    #[serde(deserialize_with = "opaque_string")]
    pub token: String,

    /// Site identifier, as shown under Settings > Integrations.
    #[serde(deserialize_with = "opaque_string")]
    pub site_id: String,

    /// Skip certificate verification (self-signed consoles).
    pub accept_invalid_certs: bool,
}

/// Accept a TOML scalar where a string is expected (`site_id = 42`).
fn opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        UInt(u64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            site_id: String::new(),
            accept_invalid_certs: true,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("token", &"[REDACTED]")
            .field("site_id", &self.site_id)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl Settings {
    /// Check that host, token and site are all present, in that order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("host", ENV_HOST, &self.host),
            ("token", ENV_TOKEN, &self.token),
            ("site_id", ENV_SITE_ID, &self.site_id),
        ];

        for (field, env, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing { field, env });
            }
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.host.clone(), SecretString::from(self.token.clone()))
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.accept_invalid_certs {
                TlsMode::AcceptInvalid
            } else {
                TlsMode::Verify
            },
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unidev", "unidev").map_or_else(
        || PathBuf::from(".unidev.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Assemble the provider chain. `path` overrides the default file
/// location and must exist.
pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
    let file = match path {
        Some(path) if !path.is_file() => {
            return Err(ConfigError::FileNotFound { path: path.into() });
        }
        Some(path) => path.to_path_buf(),
        None => config_path(),
    };

    let env = Env::prefixed(ENV_PREFIX);
    let mut figment = Figment::new()
        .merge(Toml::file(file))
        .merge(env.clone().ignore(&STRING_KEYS));

    for (key, value) in env.iter() {
        if let Some(field) = STRING_KEYS
            .iter()
            .find(|field| key.as_str().eq_ignore_ascii_case(field))
        {
            figment = figment.merge(Serialized::default(field, value));
        }
    }

    Ok(figment)
}

/// Load settings from the file and environment. Does not validate.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    Ok(figment(path)?.extract()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    fn load_in_jail(path: Option<&str>) -> figment::error::Result<Settings> {
        load(path.map(Path::new)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn reads_settings_from_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(ENV_HOST, "192.168.1.1");
            jail.set_env(ENV_TOKEN, "abc-key");
            jail.set_env(ENV_SITE_ID, "default");
            jail.create_file("empty.toml", "")?;

            let settings = load_in_jail(Some("empty.toml"))?;

            assert_eq!(settings.host, "192.168.1.1");
            assert_eq!(settings.token, "abc-key");
            assert_eq!(settings.site_id, "default");
            assert!(settings.accept_invalid_certs);
            assert!(settings.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "unidev.toml",
                r#"
                    host = "unifi.lan"
                    token = "file-key"
                    site_id = "from-file"
                    accept_invalid_certs = false
                "#,
            )?;
            jail.set_env(ENV_SITE_ID, "from-env");

            let settings = load_in_jail(Some("unidev.toml"))?;

            assert_eq!(settings.host, "unifi.lan");
            assert_eq!(settings.token, "file-key");
            assert_eq!(settings.site_id, "from-env");
            assert_eq!(settings.transport().tls, TlsMode::Verify);
            Ok(())
        });
    }

    #[test]
    fn numeric_and_boolean_looking_env_values_stay_strings() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("empty.toml", "")?;
            jail.set_env(ENV_HOST, "10.0.0.1");
            jail.set_env(ENV_TOKEN, "true");
            jail.set_env(ENV_SITE_ID, "42");

            let settings = load_in_jail(Some("empty.toml"))?;

            assert_eq!(settings.token, "true");
            assert_eq!(settings.site_id, "42");
            assert!(settings.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn all_digit_token_keeps_leading_zeros() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("empty.toml", "")?;
            jail.set_env(ENV_TOKEN, "0012345678");
            jail.set_env(ENV_SITE_ID, "false");

            let settings = load_in_jail(Some("empty.toml"))?;

            assert_eq!(settings.token, "0012345678");
            assert_eq!(settings.site_id, "false");
            Ok(())
        });
    }

    #[test]
    fn toml_scalars_are_accepted_as_strings() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "unidev.toml",
                r#"
                    host = "unifi.lan"
                    token = 1234567890
                    site_id = 42
                "#,
            )?;

            let settings = load_in_jail(Some("unidev.toml"))?;

            assert_eq!(settings.token, "1234567890");
            assert_eq!(settings.site_id, "42");
            Ok(())
        });
    }

    #[test]
    fn accept_invalid_certs_can_be_disabled_from_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("empty.toml", "")?;
            jail.set_env(ENV_ACCEPT_INVALID_CERTS, "false");

            let settings = load_in_jail(Some("empty.toml"))?;

            assert!(!settings.accept_invalid_certs);
            Ok(())
        });
    }

    #[test]
    fn missing_values_are_reported_in_order() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing { env: ENV_HOST, .. })
        ));

        settings.host = "10.0.0.1".into();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing { env: ENV_TOKEN, .. })
        ));

        settings.token = "key".into();
        settings.site_id = "   ".into();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing { field: "site_id", .. })
        ));
    }

    #[test]
    fn explicit_path_must_exist() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = load(Some(Path::new("missing.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::FileNotFound { .. }));
            Ok(())
        });
    }

    #[test]
    fn debug_output_redacts_token() {
        let settings = Settings {
            token: "very-secret".into(),
            ..Settings::default()
        };
        assert!(!format!("{settings:?}").contains("very-secret"));
    }

    #[test]
    fn credentials_and_transport_follow_settings() {
        let settings = Settings {
            host: "10.0.0.1".into(),
            token: "key".into(),
            site_id: "default".into(),
            accept_invalid_certs: true,
        };
        assert_eq!(settings.credentials().host, "10.0.0.1");
        assert_eq!(settings.transport().tls, TlsMode::AcceptInvalid);
    }
}
