use tokio::sync::watch;

/// Receiving side of the shutdown signal.
///
/// Await `changed()` to be woken when shutdown is requested.
pub type ShutdownRx = watch::Receiver<()>;

/// Sending side of the shutdown signal.
///
/// Cloneable; any holder can request shutdown and every subscriber observes it.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Signals shutdown to all subscribers.
    pub fn shutdown(&self) {
        // Send only fails when every receiver is gone, in which case there is
        // nobody left to notify.
        let _ = self.0.send(());
    }

    /// Creates a new receiver for this shutdown signal.
    pub fn subscribe(&self) -> ShutdownRx {
        self.0.subscribe()
    }
}

/// Creates a connected shutdown channel pair.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());
    (ShutdownTx(tx), rx)
}
