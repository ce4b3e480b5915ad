use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;

use super::{
    identity::IdentityResolver,
    render,
    view_model::{ViewModel, ViewModelDeriver},
    RequestHandler, UiEvent,
};
use crate::error::ClientError;
use crate::host::{Clipboard, Control, Dialog, HostBridge, Region, Surface};
use crate::models::{actions::SpinOutcome, identity::Identity, users::UserData};
use crate::repositories::api::Backend;

pub const NO_SPINS_MESSAGE: &str = "No spins left! Invite friends to earn more.";
pub const UPI_PROMPT: &str = "Enter your UPI ID and Name (e.g., name@upi):";
pub const COPIED_MESSAGE: &str = "Referral link copied!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Checking,
    Spinning,
    Resolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawalState {
    Idle,
    Validating,
    Blocked,
    Prompting,
    Submitting,
}

/// Everything the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn Backend>,
    pub surface: Arc<dyn Surface>,
    pub dialog: Arc<dyn Dialog>,
    pub clipboard: Arc<dyn Clipboard>,
}

struct Inner {
    identity: Identity,
    collaborators: Collaborators,
    deriver: ViewModelDeriver,
    animation: Duration,
    spin_disabled: AtomicBool,
    spin_state: Mutex<SpinState>,
    withdrawal_state: Mutex<WithdrawalState>,
}

#[derive(Clone)]
pub struct InteractionController {
    inner: Arc<Inner>,
}

impl InteractionController {
    pub fn new(
        identity: Identity,
        collaborators: Collaborators,
        deriver: ViewModelDeriver,
        animation: Duration,
    ) -> Self {
        let inner = Inner {
            identity,
            collaborators,
            deriver,
            animation,
            spin_disabled: AtomicBool::new(false),
            spin_state: Mutex::new(SpinState::Idle),
            withdrawal_state: Mutex::new(WithdrawalState::Idle),
        };

        InteractionController {
            inner: Arc::new(inner),
        }
    }

    /// Acknowledges the host and resolves the identity. The bridge is not
    /// consulted again afterwards.
    pub fn attach(
        bridge: &dyn HostBridge,
        collaborators: Collaborators,
        deriver: ViewModelDeriver,
        animation: Duration,
    ) -> Self {
        bridge.ready();
        let identity = IdentityResolver::resolve(bridge);
        log::info!(
            "Resolved identity {:?} ({}).",
            identity.id,
            identity.display_name
        );

        Self::new(identity, collaborators, deriver, animation)
    }

    pub fn identity(&self) -> &Identity {
        &self.inner.identity
    }

    pub fn spin_state(&self) -> SpinState {
        *self.inner.spin_state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn withdrawal_state(&self) -> WithdrawalState {
        *self
            .inner
            .withdrawal_state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_disabled(&self, control: Control) -> bool {
        match control {
            Control::SpinButton => self.inner.spin_disabled.load(Ordering::SeqCst),
            Control::CopyReferral | Control::WithdrawButton => false,
        }
    }

    fn surface(&self) -> &dyn Surface {
        self.inner.collaborators.surface.as_ref()
    }

    fn backend(&self) -> &dyn Backend {
        self.inner.collaborators.backend.as_ref()
    }

    fn dialog(&self) -> &dyn Dialog {
        self.inner.collaborators.dialog.as_ref()
    }

    fn set_spin_state(&self, state: SpinState) {
        let mut current = self.inner.spin_state.lock().unwrap_or_else(|e| e.into_inner());
        log::debug!("Spin: {:?} -> {:?}", *current, state);
        *current = state;
    }

    fn set_withdrawal_state(&self, state: WithdrawalState) {
        let mut current = self
            .inner
            .withdrawal_state
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        log::debug!("Withdrawal: {:?} -> {:?}", *current, state);
        *current = state;
    }

    fn set_spin_disabled(&self, disabled: bool) {
        self.inner.spin_disabled.store(disabled, Ordering::SeqCst);
        self.surface().set_disabled(Control::SpinButton, disabled);
    }

    pub fn derive(&self, user: &UserData) -> ViewModel {
        self.inner
            .deriver
            .derive(&self.inner.identity.display_name, user)
    }

    /// Initial load. Without an identity only the error is shown and no
    /// request is made.
    pub async fn init(&self) -> Result<(), ClientError> {
        let user_id = match self.inner.identity.require_id() {
            Ok(id) => id,
            Err(e) => {
                log::warn!("No authenticated user, actions are disabled.");
                self.surface()
                    .set_html(Region::UserInfo, &render::error_markup(&e.to_string()));
                return Err(e);
            }
        };

        self.refresh(user_id).await.map(|_| ())
    }

    /// Fetches a fresh payload and re-renders every region from it.
    pub async fn refresh(&self, user_id: i64) -> Result<ViewModel, ClientError> {
        match self.backend().fetch_user(user_id).await {
            Ok(user) => {
                let view = self.derive(&user);
                render::apply(self.surface(), &render::render(&view));
                Ok(view)
            }
            Err(e) => {
                log::warn!("Could not load user {}: {}", user_id, e);
                self.surface()
                    .set_html(Region::UserInfo, &render::error_markup(&e.to_string()));
                Err(e.into())
            }
        }
    }

    pub async fn spin(&self) -> Result<(), ClientError> {
        let user_id = self.inner.identity.require_id()?;
        self.set_spin_state(SpinState::Checking);

        let user = match self.backend().fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Spin check failed: {}", e);
                self.surface().set_text(Region::SpinResult, &e.to_string());
                self.set_spin_state(SpinState::Idle);
                return Err(e.into());
            }
        };

        if !user.has_spins() {
            self.surface().set_text(Region::SpinResult, NO_SPINS_MESSAGE);
            self.set_spin_state(SpinState::Idle);
            return Err(ClientError::BusinessRuleBlock(NO_SPINS_MESSAGE.to_string()));
        }

        self.set_spin_disabled(true);
        self.surface().set_spinning(true);
        self.set_spin_state(SpinState::Spinning);

        // The request is only issued once the animation has played out.
        tokio::time::sleep(self.inner.animation).await;
        self.surface().set_spinning(false);

        let result = self.backend().perform_spin(user_id).await;
        self.set_spin_state(SpinState::Resolved);

        let outcome = match result {
            Ok(SpinOutcome { reward }) => {
                log::info!("User {} won {}.", user_id, reward);
                self.surface()
                    .set_text(Region::SpinResult, &format!("You won ₹{}!", reward));
                self.refresh(user_id).await.map(|_| ())
            }
            Err(e) => {
                log::warn!("Spin failed: {}", e);
                self.surface().set_text(Region::SpinResult, &e.to_string());
                Err(e.into())
            }
        };

        self.set_spin_disabled(false);
        self.set_spin_state(SpinState::Idle);
        outcome
    }

    pub async fn withdraw(&self) -> Result<(), ClientError> {
        let user_id = self.inner.identity.require_id()?;
        self.set_withdrawal_state(WithdrawalState::Validating);

        let user = match self.backend().fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Withdrawal check failed: {}", e);
                self.dialog().alert(&e.to_string()).await;
                self.set_withdrawal_state(WithdrawalState::Idle);
                return Err(e.into());
            }
        };

        if !self.inner.deriver.is_eligible(&user) {
            self.set_withdrawal_state(WithdrawalState::Blocked);
            let eligibility = self.inner.deriver.eligibility();
            let message = format!(
                "You need {} referrals and ₹{} balance to withdraw!",
                eligibility.min_referrals, eligibility.min_balance
            );
            self.dialog().alert(&message).await;
            self.set_withdrawal_state(WithdrawalState::Idle);
            return Err(ClientError::BusinessRuleBlock(message));
        }

        self.set_withdrawal_state(WithdrawalState::Prompting);
        let upi_details = self
            .dialog()
            .prompt(UPI_PROMPT)
            .await
            .map(|details| details.trim().to_string())
            .filter(|details| !details.is_empty());

        let Some(upi_details) = upi_details else {
            log::debug!("Withdrawal prompt dismissed.");
            self.set_withdrawal_state(WithdrawalState::Idle);
            return Ok(());
        };

        self.set_withdrawal_state(WithdrawalState::Submitting);
        let outcome = match self.backend().request_withdrawal(user_id, &upi_details).await {
            Ok(receipt) => {
                log::info!("Withdrawal requested for {}.", user_id);
                self.dialog().alert(&receipt.message).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("Withdrawal failed: {}", e);
                self.dialog().alert(&e.to_string()).await;
                Err(e.into())
            }
        };

        self.set_withdrawal_state(WithdrawalState::Idle);
        outcome
    }

    pub async fn copy_referral(&self) -> Result<(), ClientError> {
        let user_id = self.inner.identity.require_id()?;

        let user = match self.backend().fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Referral copy failed: {}", e);
                self.dialog().alert(&e.to_string()).await;
                return Err(e.into());
            }
        };

        let link = self.inner.deriver.referral_link(&user.referral_code);
        if let Err(e) = self.inner.collaborators.clipboard.write_text(&link).await {
            log::warn!("Clipboard write failed: {}", e);
        }
        self.dialog().alert(COPIED_MESSAGE).await;

        Ok(())
    }
}

#[async_trait]
impl RequestHandler<UiEvent> for InteractionController {
    async fn handle_request(&self, request: UiEvent) {
        if self.is_disabled(request.control()) {
            log::debug!("Ignoring {:?} on a disabled control.", request);
            return;
        }

        let result = match request {
            UiEvent::SpinClicked => self.spin().await,
            UiEvent::CopyReferralClicked => self.copy_referral().await,
            UiEvent::WithdrawClicked => self.withdraw().await,
        };

        match result {
            Ok(()) => {}
            Err(ClientError::BusinessRuleBlock(reason)) => {
                log::info!("{:?} blocked: {}", request, reason)
            }
            Err(e) => log::warn!("{:?} failed: {}", request, e),
        }
    }
}
