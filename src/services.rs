use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::host::Control;

pub mod controller;
pub mod identity;
pub mod render;
pub mod view_model;

/// A click on one of the page controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    SpinClicked,
    CopyReferralClicked,
    WithdrawClicked,
}

impl UiEvent {
    pub fn control(&self) -> Control {
        match self {
            UiEvent::SpinClicked => Control::SpinButton,
            UiEvent::CopyReferralClicked => Control::CopyReferral,
            UiEvent::WithdrawClicked => Control::WithdrawButton,
        }
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    /// Each request runs in its own task; a new one never cancels those
    /// already in flight.
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub struct EventService;

impl EventService {
    pub fn new() -> Self {
        EventService {}
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Service<UiEvent, controller::InteractionController> for EventService {}
