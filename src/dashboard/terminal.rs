//! Terminal dashboard drawn with crossterm cursor positioning

use super::layout::{compose_frame, notice_row, notice_text};
use super::Dashboard;
use crate::monitor::Snapshot;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};

/// Dashboard that redraws the whole screen on every frame
pub struct TerminalDashboard<W: Write> {
    out: W,
    notice_row: u16,
}

impl TerminalDashboard<Stdout> {
    /// Draw to stdout
    pub fn stdout(table_rows: usize) -> Self {
        Self::new(io::stdout(), table_rows)
    }
}

impl<W: Write> TerminalDashboard<W> {
    /// Draw to any writer
    pub fn new(out: W, table_rows: usize) -> Self {
        Self {
            out,
            notice_row: notice_row(table_rows),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Dashboard for TerminalDashboard<W> {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        for cell in compose_frame(snapshot) {
            queue!(self.out, MoveTo(cell.col, cell.row), Print(cell.text))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        queue!(
            self.out,
            MoveTo(0, self.notice_row),
            Clear(ClearType::CurrentLine),
            Print(notice_text(message))
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }
}
