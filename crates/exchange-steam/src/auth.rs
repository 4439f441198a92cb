//! Cookie-based session for Steam Community.
//!
//! Steam Community has no API keys for market operations. Requests are
//! authenticated with the browser session cookies of a logged-in account:
//! `sessionid` (also echoed in every POST form as a CSRF token) and
//! `steamLoginSecure`.
//!
//! # Security
//!
//! - Cookies are loaded from environment variables
//! - Cookies are NEVER logged
//! - Cookie values are held in `SecretString` and zeroized on drop
//!
//! # Example
//!
//! ```ignore
//! use steam_seller_community::auth::{SteamSession, SteamSessionConfig};
//!
//! let session = SteamSession::from_env(SteamSessionConfig::default())?;
//! println!("selling as {}", session.steam_id());
//! ```

use crate::error::{CommunityError, Result};
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

// =============================================================================
// Configuration
// =============================================================================

/// Names of the environment variables holding the session.
#[derive(Debug, Clone)]
pub struct SteamSessionConfig {
    /// Environment variable name for the 64-bit SteamID.
    pub steam_id_env: String,

    /// Environment variable name for the `sessionid` cookie.
    pub session_id_env: String,

    /// Environment variable name for the `steamLoginSecure` cookie.
    pub login_secure_env: String,
}

impl Default for SteamSessionConfig {
    fn default() -> Self {
        Self {
            steam_id_env: "STEAM_ID".to_string(),
            session_id_env: "STEAM_SESSION_ID".to_string(),
            login_secure_env: "STEAM_LOGIN_SECURE".to_string(),
        }
    }
}

impl SteamSessionConfig {
    /// Sets custom environment variable names.
    #[must_use]
    pub fn with_env_vars(
        mut self,
        steam_id_env: impl Into<String>,
        session_id_env: impl Into<String>,
        login_secure_env: impl Into<String>,
    ) -> Self {
        self.steam_id_env = steam_id_env.into();
        self.session_id_env = session_id_env.into();
        self.login_secure_env = login_secure_env.into();
        self
    }
}

// =============================================================================
// SteamSession
// =============================================================================

/// A logged-in Steam Community session.
pub struct SteamSession {
    steam_id: u64,
    session_id: SecretString,
    login_secure: SecretString,
}

impl std::fmt::Debug for SteamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamSession")
            .field("steam_id", &self.steam_id)
            .field("session_id", &"[REDACTED]")
            .field("login_secure", &"[REDACTED]")
            .finish()
    }
}

impl SteamSession {
    /// Creates a session from raw cookie values.
    ///
    /// # Errors
    /// Returns error if a cookie is empty or contains characters that cannot
    /// appear in a cookie value.
    pub fn new(
        steam_id: u64,
        session_id: impl Into<String>,
        login_secure: impl Into<String>,
    ) -> Result<Self> {
        let session_id = SecretString::from(session_id.into());
        let login_secure = SecretString::from(login_secure.into());

        validate_cookie("sessionid", session_id.expose_secret())?;
        validate_cookie("steamLoginSecure", login_secure.expose_secret())?;

        Ok(Self {
            steam_id,
            session_id,
            login_secure,
        })
    }

    /// Creates a session from environment variables.
    ///
    /// # Errors
    /// Returns error if a variable is missing, the SteamID is not a number,
    /// or a cookie is invalid.
    pub fn from_env(config: SteamSessionConfig) -> Result<Self> {
        let steam_id = read_env(&config.steam_id_env)?;
        let steam_id = steam_id.trim().parse::<u64>().map_err(|_| {
            CommunityError::Configuration(format!(
                "{} is not a 64-bit SteamID",
                config.steam_id_env
            ))
        })?;

        let session_id = read_env(&config.session_id_env)?;
        let login_secure = read_env(&config.login_secure_env)?;

        Self::new(steam_id, session_id.trim(), login_secure.trim())
    }

    /// Returns the account's 64-bit SteamID.
    #[must_use]
    pub fn steam_id(&self) -> u64 {
        self.steam_id
    }

    /// Returns the `sessionid` value sent as the form CSRF token.
    pub(crate) fn session_id(&self) -> &str {
        self.session_id.expose_secret()
    }

    /// Builds the `Cookie` header, marked sensitive so it never shows up in
    /// reqwest's debug output.
    pub(crate) fn cookie_header(&self) -> Result<HeaderValue> {
        let mut cookie = format!(
            "sessionid={}; steamLoginSecure={}",
            self.session_id.expose_secret(),
            self.login_secure.expose_secret()
        );
        let value = HeaderValue::from_str(&cookie);
        cookie.zeroize();

        let Ok(mut value) = value else {
            return Err(CommunityError::Authentication(
                "cookie is not valid ASCII".to_string(),
            ));
        };
        value.set_sensitive(true);
        Ok(value)
    }
}

fn read_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| missing_env(name))
}

fn missing_env(name: &str) -> CommunityError {
    CommunityError::Configuration(format!("missing environment variable: {name}"))
}

fn validate_cookie(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CommunityError::Authentication(format!(
            "{name} cookie cannot be empty"
        )));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_graphic() && c != ';' && c != ',' && c != '"')
    {
        return Err(CommunityError::Authentication(format!(
            "{name} cookie contains invalid characters"
        )));
    }

    Ok(())
}
