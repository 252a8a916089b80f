use async_trait::async_trait;

/// Yes/no gate in front of destructive actions.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Asks the user `prompt`. `true` means go ahead.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way without asking anybody.
pub struct AutoConfirm(pub bool);

#[async_trait]
impl ConfirmationGate for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
