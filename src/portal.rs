//! Patient Portal Credentials
//!
//! The patient portal signs in with a one-time code sent by email, exchanged for a bearer
//! token. Each patient has at most one session row which moves through
//! `otp-pending → active → inactive`; requesting a new code from any state starts over.
//!
//! Only SHA-256 verifiers of the code and the token secret are ever stored.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

/// Portal token identifier prefix.
pub const PORTAL_TOKEN_PREFIX: &str = "gp";

/// Number of digits in a one-time code.
pub const OTP_DIGITS: usize = 6;

const OTP_UPPER_BOUND: u32 = 1_000_000;

/// How long a one-time code stays valid.
pub const OTP_TTL: SignedDuration = SignedDuration::from_mins(10);

/// How long a session stays valid after activation.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(24 * 30);

/// Wrong codes accepted before the pending code is discarded.
pub const MAX_OTP_ATTEMPTS: u8 = 5;

/// Number of secret bytes encoded in a portal token.
pub const PORTAL_TOKEN_SECRET_BYTES: usize = 32;

const PORTAL_TOKEN_VERSION: &str = "v1";

/// Portal sign-in failures.
///
/// The display strings are shown to patients as-is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PortalError {
    /// No code has been requested, or the pending one was used up.
    #[error("no sign-in code was requested")]
    NoSession,

    /// The pending code is older than [`OTP_TTL`].
    #[error("sign-in code has expired")]
    OtpExpired,

    /// The code does not match.
    #[error("sign-in code is invalid")]
    InvalidOtp,

    /// Too many wrong codes; a new one must be requested.
    #[error("too many attempts, request a new code")]
    TooManyAttempts,

    /// The session was signed out or never activated.
    #[error("session is not active")]
    SessionInactive,

    /// The session is older than [`SESSION_TTL`].
    #[error("session has expired")]
    SessionExpired,

    /// The bearer token is malformed or does not match.
    #[error("invalid portal token")]
    InvalidToken,
}

/// Where a patient's portal session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalSessionState {
    /// No session row exists.
    NoSession,

    /// A code was sent and not yet exchanged.
    OtpPending,

    /// A bearer token is live.
    Active,

    /// Signed out, expired or exhausted.
    Inactive,
}

impl PortalSessionState {
    /// State of an optional session at `now`.
    #[must_use]
    pub fn of(session: Option<&PortalSession>, now: Timestamp) -> Self {
        session.map_or(Self::NoSession, |session| session.state(now))
    }
}

/// A one-time sign-in code.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a random code from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let code = OsRng.gen_range(0..OTP_UPPER_BOUND);

        Self(format!("{code:0width$}", width = OTP_DIGITS))
    }

    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OtpCode {
    type Err = PortalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.len() != OTP_DIGITS || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(PortalError::InvalidOtp);
        }

        Ok(Self(value.to_string()))
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(**redacted**)")
    }
}

impl Drop for OtpCode {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Secret half of a portal token.
#[derive(Clone)]
pub struct PortalTokenSecret {
    bytes: [u8; PORTAL_TOKEN_SECRET_BYTES],
}

impl PortalTokenSecret {
    /// Generate a secret from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; PORTAL_TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self { bytes }
    }

    /// Wrap existing bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PORTAL_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    fn to_hex(&self) -> String {
        self.bytes.iter().map(|byte| format!("{byte:02x}")).collect()
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != PORTAL_TOKEN_SECRET_BYTES * 2 || !hex.is_ascii() {
            return None;
        }

        let mut bytes = [0_u8; PORTAL_TOKEN_SECRET_BYTES];

        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).ok()?;

            *byte = u8::from_str_radix(pair, 16).ok()?;
        }

        Some(Self { bytes })
    }
}

impl fmt::Debug for PortalTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PortalTokenSecret(**redacted**)")
    }
}

impl Drop for PortalTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// A parsed portal bearer token.
#[derive(Debug, Clone)]
pub struct ParsedPortalToken {
    /// Session the token was issued for.
    pub session_uuid: Uuid,

    /// Secret material.
    pub secret: PortalTokenSecret,
}

/// Render a bearer token: `gp_v1_<session uuid>.<secret hex>`.
#[must_use]
pub fn format_portal_token(session_uuid: Uuid, secret: &PortalTokenSecret) -> String {
    format!(
        "{PORTAL_TOKEN_PREFIX}_{PORTAL_TOKEN_VERSION}_{}.{}",
        session_uuid.simple(),
        secret.to_hex()
    )
}

/// Parse a bearer token.
///
/// # Errors
///
/// Returns [`PortalError::InvalidToken`] for anything not produced by [`format_portal_token`].
pub fn parse_portal_token(token: &str) -> Result<ParsedPortalToken, PortalError> {
    let (identifier, secret_hex) = token.split_once('.').ok_or(PortalError::InvalidToken)?;

    let mut parts = identifier.splitn(3, '_');

    let prefix = parts.next().ok_or(PortalError::InvalidToken)?;
    let version = parts.next().ok_or(PortalError::InvalidToken)?;
    let session = parts.next().ok_or(PortalError::InvalidToken)?;

    if prefix != PORTAL_TOKEN_PREFIX || version != PORTAL_TOKEN_VERSION {
        return Err(PortalError::InvalidToken);
    }

    let session_uuid = Uuid::try_parse(session).map_err(|_err| PortalError::InvalidToken)?;
    let secret = PortalTokenSecret::from_hex(secret_hex).ok_or(PortalError::InvalidToken)?;

    Ok(ParsedPortalToken {
        session_uuid,
        secret,
    })
}

/// Verifier stored for a one-time code, salted with the patient UUID.
#[must_use]
pub fn hash_otp(patient_uuid: Uuid, code: &OtpCode) -> String {
    sha256_hex(&format!("{}:{}", patient_uuid.simple(), code.as_str()))
}

/// Verifier stored for a token secret, salted with the session UUID.
#[must_use]
pub fn hash_token_secret(session_uuid: Uuid, secret: &PortalTokenSecret) -> String {
    sha256_hex(&format!("{}:{}", session_uuid.simple(), secret.to_hex()))
}

fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

fn verifiers_match(left: &str, right: &str) -> bool {
    left.len() == right.len()
        && left
            .bytes()
            .zip(right.bytes())
            .fold(0_u8, |diff, (l, r)| diff | (l ^ r))
            == 0
}

/// A freshly activated bearer token. The raw token is only available here.
#[derive(Debug, Clone)]
pub struct IssuedPortalToken {
    /// Raw bearer token to hand to the patient.
    pub token: String,

    /// When the token stops working.
    pub expires_at: Timestamp,
}

/// A patient's portal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSession {
    /// Session UUID, embedded in bearer tokens.
    pub uuid: Uuid,

    /// Owning patient.
    pub patient_uuid: Uuid,

    /// Verifier of the pending code.
    pub otp_hash: Option<String>,

    /// When the pending code expires.
    pub otp_expires_at: Option<Timestamp>,

    /// Wrong codes entered against the pending code.
    pub otp_attempts: u8,

    /// Verifier of the live token secret.
    pub token_hash: Option<String>,

    /// When the live token expires.
    pub token_expires_at: Option<Timestamp>,

    /// Whether the token may be used.
    pub is_active: bool,
}

impl PortalSession {
    /// Start a session with a fresh code, replacing whatever the patient had before.
    #[must_use]
    pub fn issue_otp(uuid: Uuid, patient_uuid: Uuid, now: Timestamp) -> (Self, OtpCode) {
        let code = OtpCode::generate();

        let session = Self {
            uuid,
            patient_uuid,
            otp_hash: Some(hash_otp(patient_uuid, &code)),
            otp_expires_at: Some(now + OTP_TTL),
            otp_attempts: 0,
            token_hash: None,
            token_expires_at: None,
            is_active: false,
        };

        (session, code)
    }

    /// Where the session stands at `now`.
    #[must_use]
    pub fn state(&self, now: Timestamp) -> PortalSessionState {
        if self.is_active
            && self.token_hash.is_some()
            && self.token_expires_at.is_some_and(|expires| expires > now)
        {
            return PortalSessionState::Active;
        }

        if self.otp_hash.is_some() && !self.is_active {
            return PortalSessionState::OtpPending;
        }

        PortalSessionState::Inactive
    }

    /// Exchange a code for a bearer token.
    ///
    /// The session is updated in every outcome (attempt counting, discarding expired or
    /// exhausted codes) and must be persisted whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoSession`] when no code is pending, [`PortalError::OtpExpired`]
    /// for a stale code, [`PortalError::TooManyAttempts`] once the attempt budget is spent and
    /// [`PortalError::InvalidOtp`] for a wrong code.
    pub fn verify_otp(
        &mut self,
        code: &OtpCode,
        now: Timestamp,
    ) -> Result<IssuedPortalToken, PortalError> {
        let Some(expected) = self.otp_hash.clone() else {
            return Err(PortalError::NoSession);
        };

        if self.otp_expires_at.is_none_or(|expires| expires <= now) {
            self.clear_otp();

            return Err(PortalError::OtpExpired);
        }

        if self.otp_attempts >= MAX_OTP_ATTEMPTS {
            self.clear_otp();

            return Err(PortalError::TooManyAttempts);
        }

        if !verifiers_match(&expected, &hash_otp(self.patient_uuid, code)) {
            self.otp_attempts = self.otp_attempts.saturating_add(1);

            if self.otp_attempts >= MAX_OTP_ATTEMPTS {
                self.clear_otp();

                return Err(PortalError::TooManyAttempts);
            }

            return Err(PortalError::InvalidOtp);
        }

        let secret = PortalTokenSecret::generate();
        let expires_at = now + SESSION_TTL;

        self.clear_otp();
        self.token_hash = Some(hash_token_secret(self.uuid, &secret));
        self.token_expires_at = Some(expires_at);
        self.is_active = true;

        Ok(IssuedPortalToken {
            token: format_portal_token(self.uuid, &secret),
            expires_at,
        })
    }

    /// Check a parsed bearer token against the session.
    ///
    /// The secret is checked first, so only the holder of the real token learns whether the
    /// session was signed out or has expired.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidToken`] when the token belongs to another session, the
    /// session holds no token or the secret does not match, [`PortalError::SessionInactive`]
    /// after sign-out and [`PortalError::SessionExpired`] once [`SESSION_TTL`] has passed.
    pub fn authenticate(&self, token: &ParsedPortalToken, now: Timestamp) -> Result<(), PortalError> {
        if token.session_uuid != self.uuid {
            return Err(PortalError::InvalidToken);
        }

        let Some(expected) = self.token_hash.as_deref() else {
            return Err(PortalError::InvalidToken);
        };

        if !verifiers_match(expected, &hash_token_secret(self.uuid, &token.secret)) {
            return Err(PortalError::InvalidToken);
        }

        if !self.is_active {
            return Err(PortalError::SessionInactive);
        }

        if self.token_expires_at.is_none_or(|expires| expires <= now) {
            return Err(PortalError::SessionExpired);
        }

        Ok(())
    }

    /// Sign out. The verifier is kept so the signed-out token is reported as inactive rather
    /// than invalid.
    pub fn logout(&mut self) {
        self.is_active = false;
    }

    fn clear_otp(&mut self) {
        self.otp_hash = None;
        self.otp_expires_at = None;
        self.otp_attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_hours(24 * 365 * 50)
    }

    fn wrong_code(code: &OtpCode) -> TestResult<OtpCode> {
        let wrong = if code.as_str() == "000000" {
            "000001"
        } else {
            "000000"
        };

        Ok(wrong.parse()?)
    }

    #[test]
    fn generated_codes_have_six_digits() {
        for _ in 0..50 {
            let code = OtpCode::generate();

            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn code_parsing_rejects_non_digits() {
        assert!("12345".parse::<OtpCode>().is_err());
        assert!("12345a".parse::<OtpCode>().is_err());
        assert!(" 123456 ".parse::<OtpCode>().is_ok());
    }

    #[test]
    fn token_format_round_trips() -> TestResult {
        let session = Uuid::now_v7();
        let secret = PortalTokenSecret::from_bytes([0xAB; PORTAL_TOKEN_SECRET_BYTES]);
        let token = format_portal_token(session, &secret);

        let parsed = parse_portal_token(&token)?;

        assert!(token.starts_with("gp_v1_"));
        assert_eq!(parsed.session_uuid, session);
        assert_eq!(
            hash_token_secret(session, &parsed.secret),
            hash_token_secret(session, &secret)
        );

        Ok(())
    }

    #[test]
    fn token_parsing_rejects_foreign_tokens() {
        assert!(parse_portal_token("gb_v1_00000000000000000000000000000000.aa").is_err());
        assert!(parse_portal_token("gp_v2_00000000000000000000000000000000.aa").is_err());
        assert!(parse_portal_token("gp_v1_nope.aa").is_err());
        assert!(parse_portal_token("no-dot").is_err());
    }

    #[test]
    fn issued_session_is_pending() {
        let (session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());

        assert_eq!(session.state(now()), PortalSessionState::OtpPending);
        assert_eq!(
            session.otp_hash.as_deref(),
            Some(hash_otp(session.patient_uuid, &code).as_str())
        );
        assert_eq!(
            PortalSessionState::of(None, now()),
            PortalSessionState::NoSession
        );
    }

    #[test]
    fn correct_code_activates_session() -> TestResult {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());

        let issued = session.verify_otp(&code, now())?;
        let parsed = parse_portal_token(&issued.token)?;

        assert_eq!(session.state(now()), PortalSessionState::Active);
        assert_eq!(issued.expires_at, now() + SESSION_TTL);
        assert!(session.otp_hash.is_none(), "code must be single use");
        assert!(session.authenticate(&parsed, now()).is_ok());

        Ok(())
    }

    #[test]
    fn code_cannot_be_reused() -> TestResult {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());

        session.verify_otp(&code, now())?;

        assert_eq!(
            session.verify_otp(&code, now()).err(),
            Some(PortalError::NoSession)
        );

        Ok(())
    }

    #[test]
    fn expired_code_is_rejected_and_discarded() {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());
        let later = now() + OTP_TTL;

        assert_eq!(
            session.verify_otp(&code, later).err(),
            Some(PortalError::OtpExpired)
        );
        assert!(session.otp_hash.is_none());
    }

    #[test]
    fn wrong_codes_exhaust_attempts() -> TestResult {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());
        let wrong = wrong_code(&code)?;

        for _ in 1..MAX_OTP_ATTEMPTS {
            assert_eq!(
                session.verify_otp(&wrong, now()).err(),
                Some(PortalError::InvalidOtp)
            );
        }

        assert_eq!(
            session.verify_otp(&wrong, now()).err(),
            Some(PortalError::TooManyAttempts)
        );
        assert_eq!(
            session.verify_otp(&code, now()).err(),
            Some(PortalError::NoSession)
        );

        Ok(())
    }

    #[test]
    fn authentication_failures_are_distinct() -> TestResult {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());
        let issued = session.verify_otp(&code, now())?;
        let parsed = parse_portal_token(&issued.token)?;

        let forged = ParsedPortalToken {
            session_uuid: session.uuid,
            secret: PortalTokenSecret::from_bytes([0; PORTAL_TOKEN_SECRET_BYTES]),
        };

        assert_eq!(
            session.authenticate(&forged, now()),
            Err(PortalError::InvalidToken)
        );
        assert_eq!(
            session.authenticate(&parsed, issued.expires_at),
            Err(PortalError::SessionExpired)
        );

        session.logout();

        assert_eq!(
            session.authenticate(&parsed, now()),
            Err(PortalError::SessionInactive)
        );
        assert_eq!(session.state(now()), PortalSessionState::Inactive);

        Ok(())
    }

    #[test]
    fn forged_secrets_learn_nothing_about_session_state() -> TestResult {
        let (mut session, code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());
        let issued = session.verify_otp(&code, now())?;

        let forged = ParsedPortalToken {
            session_uuid: session.uuid,
            secret: PortalTokenSecret::from_bytes([7; PORTAL_TOKEN_SECRET_BYTES]),
        };

        assert_eq!(
            session.authenticate(&forged, issued.expires_at),
            Err(PortalError::InvalidToken),
            "expired session"
        );

        session.logout();

        assert_eq!(
            session.authenticate(&forged, now()),
            Err(PortalError::InvalidToken),
            "signed-out session"
        );

        let (pending, _code) = PortalSession::issue_otp(Uuid::now_v7(), Uuid::now_v7(), now());
        let forged_pending = ParsedPortalToken {
            session_uuid: pending.uuid,
            secret: PortalTokenSecret::from_bytes([7; PORTAL_TOKEN_SECRET_BYTES]),
        };

        assert_eq!(
            pending.authenticate(&forged_pending, now()),
            Err(PortalError::InvalidToken),
            "session that never issued a token"
        );

        Ok(())
    }

    #[test]
    fn reissuing_code_revokes_active_token() -> TestResult {
        let patient = Uuid::now_v7();
        let session_uuid = Uuid::now_v7();
        let (mut session, code) = PortalSession::issue_otp(session_uuid, patient, now());
        let issued = session.verify_otp(&code, now())?;
        let parsed = parse_portal_token(&issued.token)?;

        let (reissued, _code) = PortalSession::issue_otp(session_uuid, patient, now());

        assert_eq!(reissued.state(now()), PortalSessionState::OtpPending);
        assert_eq!(
            reissued.authenticate(&parsed, now()),
            Err(PortalError::InvalidToken)
        );

        Ok(())
    }
}
