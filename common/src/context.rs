use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};

struct RawContext {
    // Dropped when the last clone of the context goes away, which is what
    // completes `Handler::cancel`.
    _sender: oneshot::Sender<()>,
    cancel_receiver: broadcast::Receiver<()>,
}

/// A cancellation token shared by everything that should stop on shutdown.
///
/// Cloning is cheap. `done()` resolves once the paired [`Handler`] asks for
/// cancellation.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl Context {
    #[must_use]
    pub fn new() -> (Self, Handler) {
        let (sender, recv) = oneshot::channel();
        let (cancel_sender, cancel_receiver) = broadcast::channel(1);

        (
            Self(Arc::new(RawContext {
                _sender: sender,
                cancel_receiver,
            })),
            Handler { recv, cancel_sender },
        )
    }

    pub async fn done(&self) {
        let mut recv = self.0.cancel_receiver.resubscribe();
        let _ = recv.recv().await;
    }
}

/// The owning side of a [`Context`].
pub struct Handler {
    recv: oneshot::Receiver<()>,
    cancel_sender: broadcast::Sender<()>,
}

impl Handler {
    /// Resolves once every clone of the context has been dropped.
    pub async fn done(&mut self) {
        let _ = (&mut self.recv).await;
    }

    /// Signals cancellation and waits for every clone of the context to be
    /// dropped.
    pub async fn cancel(self) {
        drop(self.cancel_sender);

        let _ = self.recv.await;
    }
}
