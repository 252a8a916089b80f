use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};

use crate::controller::ConfirmationGate;

/// A question waiting for the user, shown as a modal over the dashboard.
#[derive(Debug)]
pub struct ConfirmRequest {
    prompt: String,
    reply: oneshot::Sender<bool>,
}

impl ConfirmRequest {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answer(self, yes: bool) {
        debug!("Confirmation answered: {}", yes);
        if self.reply.send(yes).is_err() {
            debug!("Nobody is waiting for this confirmation anymore");
        }
    }
}

/// Hands prompts to the frame loop and waits for the key the user answers with.
///
/// A prompt nobody answers (the frame loop is gone, or dropped the request) counts as no.
pub struct TuiConfirmation {
    requests: mpsc::UnboundedSender<ConfirmRequest>,
}

impl TuiConfirmation {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConfirmRequest>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

#[async_trait]
impl ConfirmationGate for TuiConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let request = ConfirmRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            warn!("Dashboard is closed, declining {:?}", prompt);
            return false;
        }
        answer.await.unwrap_or(false)
    }
}
