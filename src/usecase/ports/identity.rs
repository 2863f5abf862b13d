use crate::domain::entities::user::UserAccount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    EmailTaken,
    InvalidCredentials,
    Message(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::EmailTaken => write!(f, "an account with this email already exists"),
            AuthError::InvalidCredentials => write!(f, "invalid email or password"),
            AuthError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Account backend. `list_accounts` doubles as the owner-id-to-email index
/// the admin view joins against.
pub trait IdentityProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<UserAccount, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError>;
    fn list_accounts(&self) -> Result<Vec<UserAccount>, AuthError>;
}
