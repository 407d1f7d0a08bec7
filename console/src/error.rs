use cosmwasm_std::StdError;
use thiserror::Error;

/// Everything that can abort a console action.
///
/// The first group is caught locally before any remote call is issued; the
/// rest surface from the provider or the contract and are not distinguished
/// further.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("A required field is empty")]
    EmptyField(),
    #[error("Amount must be a positive number")]
    InvalidAmount(),
    #[error("Duration must be a positive number of days")]
    InvalidDuration(),
    #[error("Not a plausible address: {0}")]
    MalformedAddress(String),
    #[error("No account authorized by the wallet")]
    NoAccount(),
    #[error("Not connected to a treasury contract")]
    NotConnected(),
    #[error("Wallet provider error: {0}")]
    Provider(anyhow::Error),
    #[error("Remote call failed: {0}")]
    Remote(anyhow::Error),
    #[error("{0}")]
    StdError(#[from] StdError),
}
