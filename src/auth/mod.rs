//! Authentication capability for the Gratuity Tracker API.
//!
//! The tracker never holds credentials of its own. An [`Authenticator`] is
//! injected at startup; the bundled [`ConfiguredAuthenticator`] checks
//! credentials against SHA-256 digests loaded from `users.yaml`.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::UserConfig;
use crate::error::{TrackerError, TrackerResult};

/// A username/password pair presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password, as presented.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn rejected(message: impl Into<String>) -> TrackerError {
    TrackerError::AuthenticationFailed {
        message: message.into(),
    }
}

impl Credentials {
    /// Parses an HTTP `Authorization: Basic ...` header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use gratuity_tracker::auth::Credentials;
    ///
    /// // "operator:change-me"
    /// let creds = Credentials::from_basic_header("Basic b3BlcmF0b3I6Y2hhbmdlLW1l").unwrap();
    /// assert_eq!(creds.username, "operator");
    /// assert_eq!(creds.password, "change-me");
    /// ```
    pub fn from_basic_header(value: &str) -> TrackerResult<Self> {
        let (scheme, encoded) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| rejected("malformed Authorization header"))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(rejected("only Basic authentication is supported"));
        }

        let decoded = B64
            .decode(encoded.trim())
            .map_err(|_| rejected("Authorization header is not valid base64"))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| rejected("credentials are not valid UTF-8"))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| rejected("credentials must be username:password"))?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// The authenticated username.
    pub username: String,
}

/// Verifies credentials and yields the principal they belong to.
pub trait Authenticator: Send + Sync {
    /// Returns the principal, or [`TrackerError::AuthenticationFailed`].
    fn authenticate(&self, credentials: &Credentials) -> TrackerResult<Principal>;
}

/// Returns the lowercase hex SHA-256 digest of a password.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::auth::password_digest;
///
/// assert_eq!(
///     password_digest("change-me"),
///     "e2186dbdb1bb4193608605e84f33208765b5693b55edd4f730a719a100eeea6f"
/// );
/// ```
pub fn password_digest(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

fn decode_hex_digest(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut digest = [0u8; 32];
    for (index, byte) in digest.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16).ok()?;
    }
    Some(digest)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Checks credentials against digests from configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAuthenticator {
    users: HashMap<String, [u8; 32]>,
}

impl ConfiguredAuthenticator {
    /// Builds an authenticator from configured users.
    pub fn new(users: &[UserConfig]) -> TrackerResult<Self> {
        let mut digests = HashMap::with_capacity(users.len());
        for user in users {
            let digest = decode_hex_digest(&user.password_sha256).ok_or_else(|| {
                TrackerError::InvalidConfig {
                    field: format!("users.{}.password_sha256", user.username),
                    message: "must be a 64-character hex SHA-256 digest".to_string(),
                }
            })?;
            digests.insert(user.username.clone(), digest);
        }
        Ok(Self { users: digests })
    }

    /// Returns true if no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for ConfiguredAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> TrackerResult<Principal> {
        let presented = Sha256::digest(credentials.password.as_bytes());
        match self.users.get(&credentials.username) {
            Some(expected) if constant_time_eq(expected, &presented) => Ok(Principal {
                username: credentials.username.clone(),
            }),
            _ => Err(rejected("invalid username or password")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> ConfiguredAuthenticator {
        ConfiguredAuthenticator::new(&[UserConfig {
            username: "operator".to_string(),
            password_sha256: password_digest("change-me"),
        }])
        .unwrap()
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_credentials_authenticate() {
        let principal = authenticator()
            .authenticate(&creds("operator", "change-me"))
            .unwrap();
        assert_eq!(principal.username, "operator");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let result = authenticator().authenticate(&creds("operator", "guess"));
        assert!(matches!(
            result,
            Err(TrackerError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_unknown_user_rejected() {
        let result = authenticator().authenticate(&creds("admin", "change-me"));
        assert!(result.is_err());
    }

    #[test]
    fn test_uppercase_digest_accepted() {
        let auth = ConfiguredAuthenticator::new(&[UserConfig {
            username: "ops".to_string(),
            password_sha256: password_digest("pw").to_uppercase(),
        }])
        .unwrap();
        assert!(auth.authenticate(&creds("ops", "pw")).is_ok());
    }

    #[test]
    fn test_bad_digest_in_config() {
        let result = ConfiguredAuthenticator::new(&[UserConfig {
            username: "ops".to_string(),
            password_sha256: "zz".repeat(32),
        }]);
        assert!(matches!(result, Err(TrackerError::InvalidConfig { .. })));
    }

    #[test]
    fn test_basic_header_parsing() {
        let header = format!("Basic {}", B64.encode("operator:pa:ss"));
        let parsed = Credentials::from_basic_header(&header).unwrap();
        assert_eq!(parsed, creds("operator", "pa:ss"));
    }

    #[test]
    fn test_basic_header_rejections() {
        assert!(Credentials::from_basic_header("Bearer abc").is_err());
        assert!(Credentials::from_basic_header("Basic").is_err());
        assert!(Credentials::from_basic_header("Basic !!!").is_err());
        let no_colon = format!("Basic {}", B64.encode("operator"));
        assert!(Credentials::from_basic_header(&no_colon).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", creds("operator", "secret"));
        assert!(!debug.contains("secret"));
    }
}
