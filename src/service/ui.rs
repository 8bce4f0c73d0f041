use crate::auction::{Item, ItemId, ItemIdRef};
use crate::service::{
    bidding_engine::{OwnedSniperListener, SniperListener, SniperSnapshot},
    LoopService, ServiceId,
};
use anyhow::{format_err, Context, Result};
use axum::{extract::State, routing::get, Json, Router};
use parking_lot::RwLock;
use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::info;

/// Notifies every registered listener, in registration order
#[derive(Default)]
pub struct SniperListeners(Vec<OwnedSniperListener>);

impl SniperListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: impl SniperListener + Send + 'static) -> Self {
        self.0.push(Box::new(listener));
        self
    }
}

impl SniperListener for SniperListeners {
    fn sniper_state_changed(&mut self, snapshot: &SniperSnapshot) {
        for listener in self.0.iter_mut() {
            listener.sniper_state_changed(snapshot);
        }
    }
}

/// Shows every sniper state change as a status line in the log
#[derive(Clone, Debug, Default)]
pub struct SniperStateDisplayer;

impl SniperListener for SniperStateDisplayer {
    fn sniper_state_changed(&mut self, snapshot: &SniperSnapshot) {
        info!(status = %snapshot, "sniper state changed");
    }
}

/// Latest snapshot of every sniper
#[derive(Clone, Default)]
pub struct StatusBoard(Arc<RwLock<BTreeMap<ItemId, SniperSnapshot>>>);

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing a sniper that just started joining
    pub fn track(&self, item: &Item) {
        self.0
            .write()
            .insert(item.id.clone(), SniperSnapshot::joining(&item.id));
    }

    pub fn get(&self, item_id: ItemIdRef) -> Option<SniperSnapshot> {
        self.0.read().get(item_id).cloned()
    }

    pub fn snapshots(&self) -> Vec<SniperSnapshot> {
        self.0.read().values().cloned().collect()
    }

    pub fn status_lines(&self) -> String {
        self.0
            .read()
            .values()
            .map(|snapshot| format!("{snapshot}\n"))
            .collect()
    }
}

impl SniperListener for StatusBoard {
    fn sniper_state_changed(&mut self, snapshot: &SniperSnapshot) {
        self.0
            .write()
            .insert(snapshot.item_id.clone(), snapshot.clone());
    }
}

pub async fn status_text(State(board): State<StatusBoard>) -> String {
    format!("Auction Sniper\n{}", board.status_lines())
}

pub async fn snipers_json(State(board): State<StatusBoard>) -> Json<Vec<SniperSnapshot>> {
    Json(board.snapshots())
}

pub fn router(board: StatusBoard) -> Router {
    Router::new()
        .route("/", get(status_text))
        .route("/snipers", get(snipers_json))
        .with_state(board)
}

async fn run_http_server(addr: SocketAddr, board: StatusBoard) -> Result<()> {
    info!(%addr, "serving sniper status");

    axum::Server::try_bind(&addr)?
        .serve(router(board).into_make_service())
        .await?;

    Ok(())
}

/// Status page of all the snipers, served over http
pub struct Ui {
    // cancels all tasks on drop
    _runtime: Runtime,
    server_rx: oneshot::Receiver<Result<()>>,
}

impl Ui {
    pub fn new(addr: SocketAddr, board: StatusBoard) -> Result<Self> {
        let runtime = Runtime::new()?;

        let (tx, rx) = oneshot::channel();

        runtime.spawn(async move {
            // nobody to tell if the service is already gone
            let _ = tx.send(
                run_http_server(addr, board)
                    .await
                    .with_context(|| format!("Failed to run http server on {addr}")),
            );
        });

        Ok(Self {
            _runtime: runtime,
            server_rx: rx,
        })
    }
}

impl LoopService for Ui {
    fn service_id(&self) -> ServiceId {
        "ui".to_owned()
    }

    fn run_iteration(&mut self) -> Result<()> {
        // don't hog the cpu
        std::thread::sleep(std::time::Duration::from_millis(100));

        match self.server_rx.try_recv() {
            Ok(res) => res,
            Err(oneshot::error::TryRecvError::Empty) => Ok(()),
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(format_err!("ui server died without leaving a response?!"))
            }
        }
    }
}
