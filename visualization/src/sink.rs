//! Log sink writing grid tables to an I/O stream
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::io::Write;

use log::warn;

use reduction_tsp_core::{LogSink, MatrixSnapshot};

use crate::view::GridView;

/// Writes every snapshot as a grid table followed by a blank line
///
/// Write failures are logged and otherwise ignored so that tracing never
/// interrupts a solve.
#[derive(Debug)]
pub struct TableSink<W: Write> {
    writer: W,
    view: GridView,
    failed_writes: usize,
}

impl<W: Write> TableSink<W> {
    pub fn new(writer: W, view: GridView) -> Self {
        Self {
            writer,
            view,
            failed_writes: 0,
        }
    }

    /// Number of snapshots that could not be written
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for TableSink<W> {
    fn record(&mut self, snapshot: &MatrixSnapshot) {
        let table = self.view.render(snapshot);
        if let Err(err) = writeln!(self.writer, "{table}\n").and_then(|()| self.writer.flush()) {
            self.failed_writes += 1;
            warn!("Failed to write snapshot {}: {err}", snapshot.phase);
        }
    }
}
