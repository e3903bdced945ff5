//! Frame layout
//!
//! ```text
//! update:  5s
//! showing: 900s
//! ticker:  ETH-USD price: 3021.45 hi: 3030.10 lo: 3001.00
//!
//! timestamp          price
//! 15-01-24 10:00:05  3021.45
//! ...
//! ```

use crate::monitor::Snapshot;
use chrono::Local;

/// Column where the price column starts
pub const COLUMN_WIDTH: u16 = 19;

/// Row reserved for status notices with the default 15-row table
pub const NOTICE_ROW: u16 = 21;

/// Sample timestamp format, local time on a 12-hour clock
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %I:%M:%S";

const TABLE_HEADER_ROW: u16 = 4;

/// A piece of text at a fixed zero-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCell {
    pub row: u16,
    pub col: u16,
    pub text: String,
}

impl FrameCell {
    fn new(row: u16, col: u16, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            text: text.into(),
        }
    }
}

/// Lay out a snapshot as positioned text cells
pub fn compose_frame(snapshot: &Snapshot) -> Vec<FrameCell> {
    let mut cells = vec![
        FrameCell::new(0, 0, format!("update:  {}s", snapshot.tick_interval.as_secs())),
        FrameCell::new(1, 0, format!("showing: {}s", snapshot.window_span.as_secs())),
        FrameCell::new(
            2,
            0,
            format!(
                "ticker:  {} price: {:.2} hi: {:.2} lo: {:.2}",
                snapshot.symbol, snapshot.last_price, snapshot.stats.high, snapshot.stats.low
            ),
        ),
        FrameCell::new(TABLE_HEADER_ROW, 0, "timestamp"),
        FrameCell::new(TABLE_HEADER_ROW, COLUMN_WIDTH, "price"),
    ];

    for (row, sample) in (TABLE_HEADER_ROW + 1..).zip(&snapshot.samples) {
        let timestamp = sample
            .observed_at
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT);
        cells.push(FrameCell::new(row, 0, timestamp.to_string()));
        cells.push(FrameCell::new(row, COLUMN_WIDTH, format!("{:.2}", sample.price)));
    }

    cells
}

/// Status row for a table of `table_rows` samples, one blank line below it
pub fn notice_row(table_rows: usize) -> u16 {
    let rows = u16::try_from(table_rows).unwrap_or(u16::MAX);
    TABLE_HEADER_ROW
        .saturating_add(2)
        .saturating_add(rows)
        .max(NOTICE_ROW)
}

/// Notice line as drawn on the status row
pub(crate) fn notice_text(message: &str) -> String {
    format!("[notice] {}", message)
}
