//! Tiled viewport over a sonar log.
//!
//! The viewport shows a horizontally scrolling window onto a log that is one
//! pixel column per ping wide. It partitions the log into fixed-width tiles,
//! requests each tile once from a [`TileSource`], keeps the per-pixel
//! depth/low-limit/temperature readings in a [`DepthTable`], renders the
//! visible tiles with a shared depth range and maps pointer positions to
//! depth readouts.
//!
//! [`ViewportController`] holds all state and is driven synchronously;
//! [`ViewportSession`] runs it as a single task fed by an event channel and
//! spawns the tile fetches.

pub mod controller;
pub mod depth_table;
pub mod error;
pub mod fetch;
pub mod pointer;
pub mod ruler;
pub mod session;

pub use controller::ViewportController;
pub use depth_table::DepthTable;
pub use error::{ViewportError, ViewportResult};
pub use fetch::{FetchCompletion, FetchError, FetchRequest, TilePayload, TileSource};
pub use pointer::{Readout, ScreenOrigin, ViewportGeometry};
pub use ruler::RulerOverlay;
pub use session::{ViewportEvent, ViewportHandle, ViewportObserver, ViewportSession};
