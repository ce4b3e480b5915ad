//! Capabilities the embedding page provides to the mini app.
//!
//! The element ids are the binding contract with the page markup.

use async_trait::async_trait;

use crate::models::identity::HostUser;

pub const WHEEL_ID: &str = "wheel";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    UserInfo,
    DashboardContent,
    ReferralLink,
    WithdrawalStatus,
    SpinResult,
}

impl Region {
    pub fn id(&self) -> &'static str {
        match self {
            Region::UserInfo => "user-info",
            Region::DashboardContent => "dashboard-content",
            Region::ReferralLink => "referral-link",
            Region::WithdrawalStatus => "withdrawal-status",
            Region::SpinResult => "spin-result",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    SpinButton,
    CopyReferral,
    WithdrawButton,
}

impl Control {
    pub fn id(&self) -> &'static str {
        match self {
            Control::SpinButton => "spin-button",
            Control::CopyReferral => "copy-referral",
            Control::WithdrawButton => "withdraw-button",
        }
    }
}

/// The host platform bridge.
pub trait HostBridge: Send + Sync {
    /// Readiness acknowledgement. Called once at startup.
    fn ready(&self);

    /// The current user, if the host authenticated one.
    fn user(&self) -> Option<HostUser>;
}

/// The page's addressable elements. Every write replaces the whole region.
pub trait Surface: Send + Sync {
    fn set_html(&self, region: Region, html: &str);

    fn set_text(&self, region: Region, text: &str);

    fn set_disabled(&self, control: Control, disabled: bool);

    /// Starts or stops the wheel animation.
    fn set_spinning(&self, spinning: bool);
}

/// Modal alert and input.
#[async_trait]
pub trait Dialog: Send + Sync {
    async fn alert(&self, message: &str);

    /// Resolves to `None` when the user dismisses the prompt.
    async fn prompt(&self, message: &str) -> Option<String>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), anyhow::Error>;
}
