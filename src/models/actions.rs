use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/spin/{id}`. The server may also report
/// the new balance and spin count; the client re-fetches instead.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SpinOutcome {
    pub reward: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct WithdrawalRequest {
    pub upi_details: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct WithdrawalReceipt {
    pub message: String,
}

/// The `{error}` body the backend sends alongside non-2xx statuses.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}
