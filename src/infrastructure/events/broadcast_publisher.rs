use async_trait::async_trait;

use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::domain::figures::figure::FigureEvent;

#[derive(Clone)]
pub struct BroadcastFigureEventPublisher {
    sender: tokio::sync::broadcast::Sender<FigureEvent>,
}

impl BroadcastFigureEventPublisher {
    pub fn new(sender: tokio::sync::broadcast::Sender<FigureEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl FigureEventPublisher for BroadcastFigureEventPublisher {
    async fn publish(&self, event: &FigureEvent) -> anyhow::Result<()> {
        match self.sender.send(event.clone()) {
            Ok(_) => Ok(()),
            // No active subscribers is harmless; don't propagate a 500 back to the caller.
            Err(tokio::sync::broadcast::error::SendError(_)) => Ok(()),
        }
    }
}
