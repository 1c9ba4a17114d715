use crate::{
    AnchorPointLoader, InteropBackend, InteropDeriver, InteropEngineClient, InteropEvent,
    L2Source, Metrics,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Represents an actor that processes interop events using the [`InteropDeriver`].
/// It listens for [`InteropEvent`]s and handles them one at a time, in arrival order.
#[derive(Debug)]
pub struct InteropActor<B, S, A, E> {
    deriver: InteropDeriver<B, S, A, E>,
    cancel_token: CancellationToken,
    event_rx: mpsc::Receiver<InteropEvent>,
}

impl<B, S, A, E> InteropActor<B, S, A, E>
where
    B: InteropBackend + 'static,
    S: L2Source + 'static,
    A: AnchorPointLoader + 'static,
    E: InteropEngineClient + 'static,
{
    /// Creates a new [`InteropActor`].
    pub const fn new(
        deriver: InteropDeriver<B, S, A, E>,
        cancel_token: CancellationToken,
        event_rx: mpsc::Receiver<InteropEvent>,
    ) -> Self {
        Self { deriver, cancel_token, event_rx }
    }

    /// Starts the actor, listening for events until cancelled or the inbound channel closes.
    pub async fn start(mut self) {
        Metrics::init();

        loop {
            tokio::select! {
                maybe_event = self.event_rx.recv() => {
                    let Some(event) = maybe_event else {
                        info!(target: "interop", "Interop event channel closed, stopping...");
                        break;
                    };
                    self.process(event).await;
                }
                _ = self.cancel_token.cancelled() => {
                    info!(target: "interop", "InteropActor cancellation requested, stopping...");
                    break;
                }
            }
        }
    }

    async fn process(&self, event: InteropEvent) {
        let timeout = self.deriver.config().rpc_timeout;
        match tokio::time::timeout(timeout, self.deriver.handle(event)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(target: "interop", %err, ?event, "Failed to process event");
                Metrics::record_event_error(event.name());
            }
            Err(_) => {
                error!(target: "interop", ?timeout, ?event, "Timed out processing event");
                Metrics::record_event_error(event.name());
            }
        }
    }
}
