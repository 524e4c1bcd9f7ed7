use async_trait::async_trait;

use crate::batch::EventBatch;
use crate::error::EventResult;

/// An outbound endpoint that accepts batches of serialized messages.
#[async_trait]
pub trait EventDestination: Send + Sync {
    /// Channel (stream key) messages are appended to
    fn channel(&self) -> &str;

    /// Submit every message in the batch. No retries.
    async fn send_batch(&self, batch: EventBatch) -> EventResult<()>;
}
