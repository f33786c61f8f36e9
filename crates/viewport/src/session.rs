//! Single-task driver for a [`ViewportController`].
//!
//! All input reaches the controller as [`ViewportEvent`]s on one channel and
//! is handled strictly in order. Tile fetches run as spawned tasks that post
//! their [`FetchCompletion`] back onto the same channel, so the controller is
//! never shared and never locked.
//!
//! Fetch tasks only hold weak senders: once every [`ViewportHandle`] is
//! dropped the channel closes and [`ViewportSession::run`] returns.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use renderer::TileRenderer;
use sonar_common::{DisplayOptions, TileStart};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::controller::ViewportController;
use crate::error::{ViewportError, ViewportResult};
use crate::fetch::{FetchCompletion, FetchError, FetchRequest, TileSource};
use crate::pointer::{Readout, ScreenOrigin};
use crate::ruler::RulerOverlay;

/// Input to a [`ViewportSession`].
#[derive(Debug)]
pub enum ViewportEvent {
    /// Total pixel width of the log became known.
    Initialize { total_width: u32 },
    Layout {
        width: u32,
        height: u32,
        origin: ScreenOrigin,
    },
    Scroll(u32),
    PointerMove { client_x: i32, client_y: i32 },
    Click { client_x: i32, client_y: i32 },
    SetDisplay(DisplayOptions),
    MarkDirty,
    RetryFailed,
    FetchCompleted(FetchCompletion),
    /// Reply once no fetch is in flight.
    WaitIdle(oneshot::Sender<()>),
    Shutdown,
}

/// Output side of a session. Every method has an empty default.
pub trait ViewportObserver: Send {
    fn on_readout(&mut self, _readout: &Readout, _ruler: &RulerOverlay) {}

    fn on_click(&mut self, _x: u32) {}

    fn on_tile_rendered(&mut self, _tile: &TileRenderer) {}

    fn on_fetch_failed(&mut self, _offset: TileStart, _error: &FetchError) {}
}

impl ViewportObserver for () {}

/// Cloneable sender side of a session.
#[derive(Debug, Clone)]
pub struct ViewportHandle {
    tx: mpsc::UnboundedSender<ViewportEvent>,
}

impl ViewportHandle {
    pub fn send(&self, event: ViewportEvent) -> ViewportResult<()> {
        self.tx.send(event).map_err(|_| ViewportError::SessionClosed)
    }

    pub fn initialize(&self, total_width: u32) -> ViewportResult<()> {
        self.send(ViewportEvent::Initialize { total_width })
    }

    pub fn layout(&self, width: u32, height: u32, origin: ScreenOrigin) -> ViewportResult<()> {
        self.send(ViewportEvent::Layout {
            width,
            height,
            origin,
        })
    }

    pub fn scroll(&self, scroll: u32) -> ViewportResult<()> {
        self.send(ViewportEvent::Scroll(scroll))
    }

    pub fn pointer_move(&self, client_x: i32, client_y: i32) -> ViewportResult<()> {
        self.send(ViewportEvent::PointerMove { client_x, client_y })
    }

    pub fn click(&self, client_x: i32, client_y: i32) -> ViewportResult<()> {
        self.send(ViewportEvent::Click { client_x, client_y })
    }

    pub fn set_display(&self, options: DisplayOptions) -> ViewportResult<()> {
        self.send(ViewportEvent::SetDisplay(options))
    }

    pub fn mark_dirty(&self) -> ViewportResult<()> {
        self.send(ViewportEvent::MarkDirty)
    }

    pub fn retry_failed(&self) -> ViewportResult<()> {
        self.send(ViewportEvent::RetryFailed)
    }

    /// Wait until every fetch issued so far has completed.
    pub async fn wait_idle(&self) -> ViewportResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(ViewportEvent::WaitIdle(tx))?;
        rx.await.map_err(|_| ViewportError::SessionClosed)
    }

    pub fn shutdown(&self) -> ViewportResult<()> {
        self.send(ViewportEvent::Shutdown)
    }
}

/// Owns a controller and processes its events.
pub struct ViewportSession<O: ViewportObserver> {
    controller: ViewportController,
    source: Arc<dyn TileSource>,
    observer: O,
    tx: mpsc::WeakUnboundedSender<ViewportEvent>,
    rx: mpsc::UnboundedReceiver<ViewportEvent>,
    in_flight: usize,
    idle_waiters: Vec<oneshot::Sender<()>>,
}

impl<O: ViewportObserver> ViewportSession<O> {
    pub fn new(
        controller: ViewportController,
        source: Arc<dyn TileSource>,
        observer: O,
    ) -> (Self, ViewportHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            controller,
            source,
            observer,
            tx: tx.downgrade(),
            rx,
            in_flight: 0,
            idle_waiters: Vec::new(),
        };
        (session, ViewportHandle { tx })
    }

    /// Process events until [`ViewportEvent::Shutdown`] or until every
    /// handle is dropped.
    ///
    /// Returns the controller and observer for inspection. Fetches still in
    /// flight are abandoned.
    pub async fn run(mut self) -> (ViewportController, O) {
        info!(tile_width = self.controller.tile_width(), "Viewport session started");

        while let Some(event) = self.rx.recv().await {
            if matches!(event, ViewportEvent::Shutdown) {
                break;
            }
            self.handle(event);

            if self.in_flight == 0 {
                for waiter in self.idle_waiters.drain(..) {
                    let _ = waiter.send(());
                }
            }
        }

        info!(
            tiles = self.controller.tiles().len(),
            in_flight = self.in_flight,
            "Viewport session stopped"
        );
        (self.controller, self.observer)
    }

    fn handle(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::Initialize { total_width } => {
                self.controller.initialize(total_width);
            }
            ViewportEvent::Layout {
                width,
                height,
                origin,
            } => {
                let requests = self.controller.on_layout(width, height, origin);
                self.spawn_fetches(requests);
                self.notify_last_rendered();
            }
            ViewportEvent::Scroll(scroll) => {
                let requests = self.controller.on_scroll(scroll);
                self.spawn_fetches(requests);
                self.notify_last_rendered();
            }
            ViewportEvent::PointerMove { client_x, client_y } => {
                if let Some((readout, ruler)) = self.controller.pointer_move(client_x, client_y) {
                    self.observer.on_readout(&readout, &ruler);
                }
            }
            ViewportEvent::Click { client_x, client_y } => {
                if let Some(x) = self.controller.click(client_x, client_y) {
                    self.observer.on_click(x);
                }
            }
            ViewportEvent::SetDisplay(options) => {
                let rendered = self.controller.set_display(options);
                self.notify_rendered(&rendered);
            }
            ViewportEvent::MarkDirty => {
                let requests = self.controller.mark_dirty();
                self.spawn_fetches(requests);
                self.notify_last_rendered();
            }
            ViewportEvent::RetryFailed => {
                self.controller.retry_failed_tiles();
                let scroll = self.controller.geometry().scroll;
                let requests = self.controller.fetch_requests(scroll);
                self.spawn_fetches(requests);
            }
            ViewportEvent::FetchCompleted(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if let Err(e) = &completion.result {
                    self.observer.on_fetch_failed(completion.request.offset, e);
                }
                match self.controller.on_fetch_complete(completion) {
                    Ok(rendered) => self.notify_rendered(&rendered),
                    Err(e) => warn!(error = %e, "Dropping tile payload"),
                }
            }
            ViewportEvent::WaitIdle(waiter) => self.idle_waiters.push(waiter),
            ViewportEvent::Shutdown => {}
        }
    }

    fn spawn_fetches(&mut self, requests: Vec<FetchRequest>) {
        for request in requests {
            self.in_flight += 1;
            let source = Arc::clone(&self.source);
            let tx = self.tx.clone();

            tokio::spawn(async move {
                let result = AssertUnwindSafe(source.fetch_tile(request))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(FetchError::unavailable("fetch task panicked")));
                debug!(offset = request.offset, ok = result.is_ok(), "Fetch finished");
                // Every handle may already be gone
                if let Some(tx) = tx.upgrade() {
                    let _ = tx.send(ViewportEvent::FetchCompleted(FetchCompletion { request, result }));
                }
            });
        }
    }

    fn notify_rendered(&mut self, starts: &[TileStart]) {
        for start in starts {
            if let Some(tile) = self.controller.tile(*start) {
                self.observer.on_tile_rendered(tile);
            }
        }
    }

    fn notify_last_rendered(&mut self) {
        let redrawn = self.controller.last_rendered().to_vec();
        self.notify_rendered(&redrawn);
    }
}
