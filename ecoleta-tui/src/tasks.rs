//! Runs form requests in the background and reports completions to the UI loop.

use std::sync::Arc;

use ecoleta_core::{
    form::{Completion, Request},
    service::EcoletaService,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) struct TaskRunner {
    service: Arc<EcoletaService>,
    tx: mpsc::UnboundedSender<Completion>,
    token: CancellationToken,
}

impl TaskRunner {
    pub(crate) fn new(service: Arc<EcoletaService>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            service,
            tx,
            token: CancellationToken::new(),
        };
        (runner, rx)
    }

    pub(crate) fn spawn(&self, request: Request) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let token = self.token.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("request dropped, form closed");
                }
                completion = service.execute(request) => {
                    if tx.send(completion).is_err() {
                        debug!("completion dropped, form closed");
                    }
                }
            }
        });
    }

    pub(crate) fn spawn_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.spawn(request);
        }
    }

    /// Abandon every request still in flight.
    pub(crate) fn shutdown(&self) {
        self.token.cancel();
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
