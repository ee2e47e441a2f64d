use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, put};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::{Dispatcher, Reply, Request};
use crate::record::Record;
use crate::store::RecordStore;

/// Default time open connections get to drain after `/close`
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// HTTP server for one record collection
pub struct Server<R: Record> {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<ServerState<R>>,
    shutdown_grace: Duration,
}

/// State shared with the request handlers
struct ServerState<R: Record> {
    dispatcher: Dispatcher,
    store: Arc<RecordStore<R>>,
    /// Serializes shutdown; true once the store has been persisted
    stopped: Mutex<bool>,
    shutdown: watch::Sender<bool>,
}

impl<R: Record> ServerState<R> {
    /// Persist the store and signal the listener to shut down
    async fn stop(&self) {
        let mut stopped = self.stopped.lock().await;
        if *stopped {
            debug!("Server already stopped");
            return;
        }

        info!(
            "Persisting {} to {}",
            R::COLLECTION_KEY,
            self.store.path().display()
        );
        if let Err(e) = self.store.store() {
            error!("storing failed with error: {}", e);
        }

        self.shutdown.send_replace(true);
        *stopped = true;
    }
}

/// Triggers the same shutdown as `PUT /close`
#[derive(Clone)]
pub struct ShutdownHandle<R: Record> {
    state: Arc<ServerState<R>>,
}

impl<R: Record> ShutdownHandle<R> {
    pub async fn stop(&self) {
        self.state.stop().await
    }
}

impl<R: Record> Server<R> {
    /// Open the configured data file and bind the listener
    pub async fn start(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(RecordStore::open(config.data_file())?);
        let server = Self::bind(&config.server_addr, store).await?;
        Ok(server.with_shutdown_grace(config.shutdown_grace()))
    }

    /// Bind to `addr` with the stock handlers over `store`
    pub async fn bind(addr: &str, store: Arc<RecordStore<R>>) -> Result<Self> {
        let dispatcher = Dispatcher::new(Arc::clone(&store));
        Self::bind_with(addr, store, dispatcher).await
    }

    /// Bind to `addr` with a caller-assembled dispatcher
    pub async fn bind_with(
        addr: &str,
        store: Arc<RecordStore<R>>,
        dispatcher: Dispatcher,
    ) -> Result<Self> {
        if addr.is_empty() {
            return Err(Error::InvalidArgument("port may not be empty".to_string()));
        }

        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        let (shutdown, _) = watch::channel(false);
        let state = Arc::new(ServerState {
            dispatcher,
            store,
            stopped: Mutex::new(false),
            shutdown,
        });

        Ok(Self {
            listener,
            local_addr,
            state,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        })
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> Arc<RecordStore<R>> {
        Arc::clone(&self.state.store)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle<R> {
        ShutdownHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn router(state: Arc<ServerState<R>>) -> Router {
        Router::new()
            .route("/close", put(close::<R>))
            .route(R::ROUTE, any(handle_records::<R>))
            .layer(DefaultBodyLimit::disable())
            .with_state(state)
    }

    /// Serve until shutdown is requested.
    ///
    /// After the shutdown signal open connections get the grace period to
    /// finish; the listener is dropped either way once it elapses.
    pub async fn run(self) -> Result<()> {
        let Self {
            listener,
            local_addr,
            state,
            shutdown_grace,
        } = self;

        info!(
            "Server started, serving {} on {}{}",
            R::COLLECTION_KEY,
            local_addr,
            R::ROUTE
        );

        let mut graceful = state.shutdown.subscribe();
        let mut forced = state.shutdown.subscribe();

        let serve = axum::serve(listener, Self::router(Arc::clone(&state))).with_graceful_shutdown(
            async move {
                let _ = graceful.wait_for(|stop| *stop).await;
                info!("Shutdown requested, draining connections");
            },
        );

        tokio::select! {
            result = serve.into_future() => result?,
            _ = async move {
                let _ = forced.wait_for(|stop| *stop).await;
                tokio::time::sleep(shutdown_grace).await;
            } => warn!("Connections still open after {:?}, forcing close", shutdown_grace),
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn handle_records<R: Record>(
    State(state): State<Arc<ServerState<R>>>,
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let request = Request::new(method)
        .with_query_pairs(query)
        .with_body(body);
    let mut reply = Reply::new();

    match state.dispatcher.handle_request(&request, &mut reply).await {
        Ok(()) => reply.into_response(),
        Err(e) => {
            warn!("{} {} failed: {}", request.method, R::ROUTE, e);
            e.status_code().into_response()
        }
    }
}

async fn close<R: Record>(State(state): State<Arc<ServerState<R>>>) -> StatusCode {
    state.stop().await;
    StatusCode::OK
}
