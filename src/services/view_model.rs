use crate::models::users::UserData;
use crate::settings::Eligibility;

/// Presentational facts derived from one user-data payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub welcome: String,
    pub balance: f64,
    pub spins_left: i64,
    pub referral_count: usize,
    pub referral_earnings: f64,
    pub referral_link: String,
    pub eligible: bool,
    pub min_referrals: usize,
    pub min_balance: f64,
}

#[derive(Clone, Debug)]
pub struct ViewModelDeriver {
    bot_username: String,
    eligibility: Eligibility,
}

impl ViewModelDeriver {
    pub fn new(bot_username: &str, eligibility: Eligibility) -> Self {
        Self {
            bot_username: bot_username.to_string(),
            eligibility,
        }
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    pub fn referral_link(&self, referral_code: &str) -> String {
        format!("https://t.me/{}?start={}", self.bot_username, referral_code)
    }

    /// Both thresholds are inclusive.
    pub fn is_eligible(&self, user: &UserData) -> bool {
        user.referral_count() >= self.eligibility.min_referrals
            && user.balance >= self.eligibility.min_balance
    }

    pub fn derive(&self, display_name: &str, user: &UserData) -> ViewModel {
        ViewModel {
            welcome: format!("Welcome, {}!", display_name),
            balance: user.balance,
            spins_left: user.spins_left,
            referral_count: user.referral_count(),
            referral_earnings: user.referral_earnings,
            referral_link: self.referral_link(&user.referral_code),
            eligible: self.is_eligible(user),
            min_referrals: self.eligibility.min_referrals,
            min_balance: self.eligibility.min_balance,
        }
    }
}
