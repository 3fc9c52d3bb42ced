use async_trait::async_trait;
use inquire::Confirm;

/// Seam for the destructive-action confirmation dialog, so flows can be
/// exercised in tests with scripted answers.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

pub struct InquireConfirm;

#[async_trait]
impl ConfirmPrompt for InquireConfirm {
    async fn confirm(&self, message: &str) -> bool {
        Confirm::new(message)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}
