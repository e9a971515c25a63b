//! Mock edge source for testing and development.
//!
//! This module provides a simulated GPIO line whose presses and releases are
//! driven programmatically, so the press engine can be exercised without
//! physical buttons.

use crate::{
    HardwareError, Result,
    traits::EdgeSource,
    types::{Edge, EdgeEvent},
};
use gpbuttond_core::LineId;
use tokio::sync::mpsc;

/// Mock edge source for a single line.
///
/// Edges are received through an internal channel. Tests send them with a
/// [`MockEdgeHandle`]. No debouncing is applied: every edge sent is
/// delivered as-is, including protocol violations such as two consecutive
/// `Down` edges.
///
/// # Examples
///
/// ```
/// use gpbuttond_core::LineId;
/// use gpbuttond_hardware::mock::MockEdgeSource;
/// use gpbuttond_hardware::traits::EdgeSource;
/// use gpbuttond_hardware::types::Edge;
///
/// #[tokio::main]
/// async fn main() -> gpbuttond_hardware::Result<()> {
///     let (mut source, handle) = MockEdgeSource::new(LineId::new(19));
///
///     handle.press().await?;
///     handle.release().await?;
///
///     assert_eq!(source.next_edge().await?.edge, Edge::Down);
///     assert_eq!(source.next_edge().await?.edge, Edge::Up);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockEdgeSource {
    /// Channel receiver for simulated edges
    edge_rx: mpsc::Receiver<Edge>,

    /// Line this source pretends to monitor
    line: LineId,
}

impl MockEdgeSource {
    /// Create a new mock source for `line`.
    ///
    /// Returns a tuple of (MockEdgeSource, MockEdgeHandle) where the handle
    /// drives the source.
    pub fn new(line: LineId) -> (Self, MockEdgeHandle) {
        let (edge_tx, edge_rx) = mpsc::channel(32);

        let source = Self { edge_rx, line };
        let handle = MockEdgeHandle { edge_tx, line };

        (source, handle)
    }
}

impl EdgeSource for MockEdgeSource {
    async fn next_edge(&mut self) -> Result<EdgeEvent> {
        let edge = self.edge_rx.recv().await.ok_or_else(|| {
            HardwareError::disconnected(format!("mock line {} edge channel closed", self.line))
        })?;

        Ok(EdgeEvent::now(self.line, edge))
    }

    fn line(&self) -> LineId {
        self.line
    }
}

/// Handle for driving a mock edge source.
///
/// Can be cloned and shared across tasks. Dropping every handle closes the
/// source, which then reports [`HardwareError::Disconnected`].
#[derive(Debug, Clone)]
pub struct MockEdgeHandle {
    /// Channel sender for simulated edges
    edge_tx: mpsc::Sender<Edge>,

    /// Line of the paired source
    line: LineId,
}

impl MockEdgeHandle {
    /// Send a raw edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn send_edge(&self, edge: Edge) -> Result<()> {
        self.edge_tx.send(edge).await.map_err(|_| {
            HardwareError::disconnected(format!("mock line {} edge channel closed", self.line))
        })
    }

    /// Simulate the button going down.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn press(&self) -> Result<()> {
        self.send_edge(Edge::Down).await
    }

    /// Simulate the button coming back up.
    ///
    /// # Errors
    ///
    /// Returns an error if the source has been dropped.
    pub async fn release(&self) -> Result<()> {
        self.send_edge(Edge::Up).await
    }

    /// Line of the paired source.
    pub fn line(&self) -> LineId {
        self.line
    }
}
