//! Built-in action handlers addressed by `handler_id`.

use async_trait::async_trait;

use crate::core::SearchResultItemAction;

use super::error::ExtensionResult;

/// A component that interprets the `argument` of actions carrying its id.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn id(&self) -> &str;

    /// Execute the action. Malformed arguments must fail, never no-op.
    async fn invoke(&self, action: &SearchResultItemAction) -> ExtensionResult<()>;
}
