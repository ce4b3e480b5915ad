use serde::{Deserialize, Serialize};

/// An entry of the referral list. Only the number of entries matters to the
/// client, so the body is kept as-is.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Referral(pub serde_json::Value);

/// Body of `GET /api/user/{id}`. Unknown fields are ignored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserData {
    pub balance: f64,
    pub spins_left: i64,
    pub referrals: Vec<Referral>,
    pub referral_code: String,
    pub referral_earnings: f64,
}

impl UserData {
    pub fn referral_count(&self) -> usize {
        self.referrals.len()
    }

    pub fn has_spins(&self) -> bool {
        self.spins_left > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_user_endpoint_body() {
        let body = json!({
            "user_id": 42,
            "username": "alice",
            "balance": 120,
            "spins_left": 2,
            "referrals": [1001, 1002, 1003],
            "referral_code": "a1b2c3d4",
            "referral_earnings": 30,
            "last_spin_date": "2024-05-01"
        });

        let user: UserData = serde_json::from_value(body).unwrap();
        assert_eq!(user.balance, 120.0);
        assert_eq!(user.referral_count(), 3);
        assert_eq!(user.referral_code, "a1b2c3d4");
        assert!(user.has_spins());
    }

    #[test]
    fn rejects_error_body() {
        let body = json!({"error": "User not found"});
        assert!(serde_json::from_value::<UserData>(body).is_err());
    }
}
