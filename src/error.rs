use thiserror::Error;

/// Failure of a single backend call. `Display` is the user-visible text.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// The backend answered with an `{error}` body.
    #[error("{0}")]
    Rejected(String),
    /// Transport failure, non-2xx without a readable body, or an
    /// undecodable response.
    #[error("{}", .operation.fallback_message())]
    Transport { operation: Operation },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    FetchUser,
    PerformSpin,
    RequestWithdrawal,
}

impl Operation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::FetchUser => "Failed to fetch user data",
            Operation::PerformSpin => "Failed to perform spin",
            Operation::RequestWithdrawal => "Failed to request withdrawal",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClientError {
    #[error("User not authenticated.")]
    Unauthenticated,
    #[error(transparent)]
    Transport(#[from] ApiError),
    #[error("{0}")]
    BusinessRuleBlock(String),
}
