//! Dashboard module
//!
//! Fixed-layout text frame drawn from a monitor snapshot

mod layout;
mod terminal;

pub use layout::{compose_frame, notice_row, FrameCell, COLUMN_WIDTH, NOTICE_ROW, TIMESTAMP_FORMAT};
pub use terminal::TerminalDashboard;

use crate::monitor::Snapshot;

/// Trait for dashboard implementations
pub trait Dashboard: Send {
    /// Draw a full frame
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;
    /// Show a one-line status message
    fn notify(&mut self, message: &str) -> anyhow::Result<()>;
    /// Blank the display
    fn clear(&mut self) -> anyhow::Result<()>;
}
