use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::{ActionContext, ActionRequest, ActionRequestClient, ActionResponse, ChannelError};

type Envelope = (ActionRequest, oneshot::Sender<ActionResponse>);

struct Registration {
    id: u64,
    sender: mpsc::Sender<Envelope>,
}

struct BusInner {
    name: String,
    services: Mutex<HashMap<String, Registration>>,
    next_id: AtomicU64,
    // Bumped on every (un)registration
    generation: watch::Sender<u64>,
    shutdown: CancellationToken,
}

/// Address to endpoint registry connecting clients and services of one process.
#[derive(Clone)]
pub struct LocalBus {
    inner: Arc<BusInner>,
}

impl LocalBus {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shutdown(name, CancellationToken::new())
    }

    pub fn with_shutdown(name: impl Into<String>, shutdown: CancellationToken) -> Self {
        let (generation, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(BusInner {
                name: name.into(),
                services: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                generation,
                shutdown,
            }),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// Registers a service at `address`, replacing any previous one
    pub fn serve(&self, address: impl Into<String>, capacity: usize) -> ServiceEndpoint {
        let address = address.into();
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let previous = self
            .services()
            .insert(address.clone(), Registration { id, sender });
        if previous.is_some() {
            tracing::warn!("Replacing service at {address}");
        }
        // Announced only once clients can find it
        self.inner.generation.send_modify(|generation| *generation += 1);
        tracing::debug!("Serving {address}");

        ServiceEndpoint {
            address,
            id,
            receiver,
            bus: self.clone(),
        }
    }

    /// Removes the service at `address`, pending requests are dropped
    pub fn unserve(&self, address: &str) -> bool {
        let removed = self.services().remove(address).is_some();
        if removed {
            self.inner.generation.send_modify(|generation| *generation += 1);
        }
        removed
    }

    pub fn is_served(&self, address: &str) -> bool {
        self.sender(address).is_some()
    }

    fn services(&self) -> MutexGuard<'_, HashMap<String, Registration>> {
        self.inner
            .services
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn sender(&self, address: &str) -> Option<mpsc::Sender<Envelope>> {
        self.services()
            .get(address)
            .filter(|registration| !registration.sender.is_closed())
            .map(|registration| registration.sender.clone())
    }

    fn unregister(&self, address: &str, id: u64) {
        let mut services = self.services();
        if services.get(address).is_some_and(|registration| registration.id == id) {
            services.remove(address);
            drop(services);
            self.inner.generation.send_modify(|generation| *generation += 1);
        }
    }
}

impl ActionContext for LocalBus {
    type Client = LocalClient;
    type Oracle = CancellationToken;

    fn create_client(&self, address: &str) -> Self::Client {
        LocalClient {
            address: address.to_owned(),
            bus: self.clone(),
        }
    }

    fn shutdown_oracle(&self) -> Self::Oracle {
        self.inner.shutdown.clone()
    }

    fn logger_name(&self) -> &str {
        &self.inner.name
    }
}

pub struct LocalClient {
    address: String,
    bus: LocalBus,
}

#[async_trait::async_trait(?Send)]
impl ActionRequestClient for LocalClient {
    fn address(&self) -> &str {
        &self.address
    }

    async fn wait_for_reachable(&self, timeout: Duration) -> bool {
        // Subscribe first so a registration racing the check is not missed
        let mut generation = self.bus.inner.generation.subscribe();
        let reachable = async {
            loop {
                if self.bus.is_served(&self.address) {
                    return;
                }
                if generation.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::time::timeout(timeout, reachable).await.is_ok()
    }

    async fn call(&self, request: ActionRequest) -> Result<ActionResponse, ChannelError> {
        let sender = self
            .bus
            .sender(&self.address)
            .ok_or(ChannelError::Unreachable)?;

        let (reply, response) = oneshot::channel();
        sender
            .send((request, reply))
            .await
            .map_err(|_| ChannelError::Disconnected)?;
        response.await.map_err(|_| ChannelError::Disconnected)
    }
}

/// One received request. Dropping it without responding disconnects the caller.
pub struct ServiceCall {
    request: ActionRequest,
    reply: oneshot::Sender<ActionResponse>,
}

impl ServiceCall {
    pub fn request(&self) -> &ActionRequest {
        &self.request
    }

    /// Returns `false` when the caller stopped waiting
    pub fn respond(self, response: ActionResponse) -> bool {
        self.reply.send(response).is_ok()
    }
}

/// Service side of an address. Dropping it makes the address unreachable.
pub struct ServiceEndpoint {
    address: String,
    id: u64,
    receiver: mpsc::Receiver<Envelope>,
    bus: LocalBus,
}

impl ServiceEndpoint {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `None` once the bus shuts down or the address was unserved
    pub async fn recv(&mut self) -> Option<ServiceCall> {
        let shutdown = self.bus.inner.shutdown.clone();
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            envelope = self.receiver.recv() => {
                envelope.map(|(request, reply)| ServiceCall { request, reply })
            }
        }
    }
}

impl Drop for ServiceEndpoint {
    fn drop(&mut self) {
        self.bus.unregister(&self.address, self.id);
    }
}
