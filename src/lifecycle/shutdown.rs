//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to the server and any background tasks.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver to hand to [`HttpServer::run`](crate::http::HttpServer::run).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.trigger(), 0);

        let mut rx = shutdown.subscribe();
        assert_eq!(shutdown.trigger(), 1);
        assert!(rx.recv().await.is_ok());
    }
}
