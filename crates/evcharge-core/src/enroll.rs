//! Three-step account enrollment: identity, emailed code, then password.
//!
//! Each step validates input locally before touching the network; a failed
//! step leaves the enrollment where it was so the caller can retry. The
//! final step persists the issued token and user atomically.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::auth::AuthGrant;
use crate::api::{ApiClient, ApiError};
use crate::session::Session;

static TEN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));

/// Identity collected in the first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Which step the enrollment is at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollStep {
    CollectIdentity,
    AwaitCode,
    SetPassword,
    Committed,
}

enum EnrollState {
    CollectIdentity { draft: Option<Identity> },
    AwaitCode { identity: Identity },
    SetPassword { identity: Identity },
    Committed,
}

/// Why an enrollment operation failed.
#[derive(Debug)]
pub enum EnrollError {
    /// Rejected locally; no request was made.
    Invalid(String),
    /// The API rejected the step.
    Api(ApiError),
    /// The grant could not be persisted.
    Storage(anyhow::Error),
}

impl std::fmt::Display for EnrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "{msg}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "Failed to save session: {err}"),
        }
    }
}

impl std::error::Error for EnrollError {}

impl From<ApiError> for EnrollError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Driver for the three-step registration flow.
pub struct Enrollment {
    client: ApiClient,
    state: EnrollState,
}

impl Enrollment {
    /// Starts a fresh enrollment at the identity step.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: EnrollState::CollectIdentity { draft: None },
        }
    }

    /// Current step.
    pub fn step(&self) -> EnrollStep {
        match &self.state {
            EnrollState::CollectIdentity { .. } => EnrollStep::CollectIdentity,
            EnrollState::AwaitCode { .. } => EnrollStep::AwaitCode,
            EnrollState::SetPassword { .. } => EnrollStep::SetPassword,
            EnrollState::Committed => EnrollStep::Committed,
        }
    }

    /// Identity captured so far, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            EnrollState::CollectIdentity { draft } => draft.as_ref(),
            EnrollState::AwaitCode { identity } | EnrollState::SetPassword { identity } => {
                Some(identity)
            }
            EnrollState::Committed => None,
        }
    }

    /// Submits the identity and requests an OTP.
    ///
    /// All three fields are required and the phone must contain exactly ten
    /// digits once formatting is stripped. The phone is sent as typed.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn submit_identity(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<String, EnrollError> {
        if !matches!(self.state, EnrollState::CollectIdentity { .. }) {
            return Err(EnrollError::Invalid(
                "Identity has already been submitted".to_string(),
            ));
        }

        let name = name.trim();
        let email = email.trim();
        let phone = phone.trim();
        if name.is_empty() || email.is_empty() || phone.is_empty() {
            return Err(EnrollError::Invalid("Please fill all fields".to_string()));
        }

        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if !TEN_DIGITS.is_match(&digits) {
            return Err(EnrollError::Invalid(
                "Please enter a valid 10-digit phone number".to_string(),
            ));
        }

        let delivery = self.client.register(name, email, phone).await?;
        self.state = EnrollState::AwaitCode {
            identity: Identity {
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
            },
        };
        Ok(delivery.message)
    }

    /// Verifies the emailed OTP.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn submit_code(&mut self, otp: &str) -> Result<String, EnrollError> {
        let identity = match &self.state {
            EnrollState::AwaitCode { identity } => identity.clone(),
            _ => return Err(EnrollError::Invalid("Not awaiting an OTP".to_string())),
        };

        let otp = otp.trim();
        if otp.len() != 6 {
            return Err(EnrollError::Invalid(
                "Please enter a valid 6-digit OTP".to_string(),
            ));
        }

        let verified = self.client.verify_otp(&identity.email, otp).await?;
        self.state = EnrollState::SetPassword { identity };
        Ok(verified.message)
    }

    /// Requests a fresh OTP without leaving the code step.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn resend_code(&mut self) -> Result<String, EnrollError> {
        let identity = match &self.state {
            EnrollState::AwaitCode { identity } => identity.clone(),
            _ => return Err(EnrollError::Invalid("Not awaiting an OTP".to_string())),
        };

        let delivery = self
            .client
            .resend_otp(&identity.name, &identity.email, &identity.phone)
            .await?;
        Ok(delivery.message)
    }

    /// Sets the password, persists the grant, and completes the enrollment.
    ///
    /// The token and user are written together; a storage failure leaves
    /// the enrollment at the password step.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn submit_password(
        &mut self,
        password: &str,
        confirm: &str,
    ) -> Result<AuthGrant, EnrollError> {
        let identity = match &self.state {
            EnrollState::SetPassword { identity } => identity.clone(),
            _ => {
                return Err(EnrollError::Invalid(
                    "Email has not been verified yet".to_string(),
                ));
            }
        };

        if password.chars().count() < 6 {
            return Err(EnrollError::Invalid(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        if password != confirm {
            return Err(EnrollError::Invalid("Passwords do not match".to_string()));
        }

        let grant = self.client.set_password(&identity.email, password).await?;
        let session = Session::authenticated(grant.access_token.clone(), grant.user.clone());
        self.client
            .store()
            .write(&session)
            .map_err(EnrollError::Storage)?;
        self.state = EnrollState::Committed;
        Ok(grant)
    }

    /// Returns to the identity step from the code step, keeping the
    /// identity as a prefilled draft. Returns false anywhere else.
    pub fn back(&mut self) -> bool {
        if let EnrollState::AwaitCode { identity } = &self.state {
            let draft = identity.clone();
            self.state = EnrollState::CollectIdentity { draft: Some(draft) };
            true
        } else {
            false
        }
    }
}
