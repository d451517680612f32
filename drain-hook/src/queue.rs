use aws_config::SdkConfig;

/// Wait applied to every receive call, in seconds. Long polling keeps the
/// request count low while the queue is idle.
const RECEIVE_WAIT_SECONDS: i32 = 20;

/// Upper bound on messages returned by a single receive call.
const RECEIVE_BATCH_SIZE: i32 = 10;

/// One lifecycle notification pulled from the queue.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: String,
    pub receipt_handle: String,
}

/// Long-polling consumer for the lifecycle notification queue.
///
/// Messages are not deleted on receive; the caller deletes a message only once
/// it has been fully handled, so unhandled messages come back after their
/// visibility timeout.
#[derive(Debug, Clone)]
pub struct QueueConsumer {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl QueueConsumer {
    pub fn new(sdk_config: &SdkConfig, queue_url: String) -> Self {
        Self {
            client: aws_sdk_sqs::Client::new(sdk_config),
            queue_url,
        }
    }

    /// Receives the next batch of notifications, long-polling until at least
    /// one message arrives or the wait elapses.
    pub async fn receive(&self) -> anyhow::Result<Vec<QueueMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .wait_time_seconds(RECEIVE_WAIT_SECONDS)
            .max_number_of_messages(RECEIVE_BATCH_SIZE)
            .send()
            .await?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| match (message.body, message.receipt_handle) {
                (Some(body), Some(receipt_handle)) => Some(QueueMessage {
                    body,
                    receipt_handle,
                }),
                _ => None,
            })
            .collect();

        Ok(messages)
    }

    /// Deletes a fully handled message from the queue.
    pub async fn delete(&self, receipt_handle: &str) -> anyhow::Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
