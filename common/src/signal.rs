use tokio::signal::unix::{Signal, SignalKind};

/// Fans multiple unix signals into a single `recv` call.
#[derive(Default)]
pub struct SignalHandler {
    signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, kind: SignalKind) -> Self {
        let signal = tokio::signal::unix::signal(kind).expect("failed to create signal");
        self.signals.push((kind, signal));
        self
    }

    /// Waits for any of the registered signals. Pends forever when none are
    /// registered.
    pub async fn recv(&mut self) -> SignalKind {
        if self.signals.is_empty() {
            return std::future::pending().await;
        }

        let futures = self
            .signals
            .iter_mut()
            .map(|(kind, signal)| {
                let kind = *kind;
                Box::pin(async move {
                    signal.recv().await;
                    kind
                })
            })
            .collect::<Vec<_>>();

        futures::future::select_all(futures).await.0
    }
}
