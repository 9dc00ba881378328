//! Output of a bootstrap run.

use sunsynth_pool::ChunkKey;
use sunsynth_table::TimeTable;

/// One drawn chunk: which source chunk fills which destination chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDraw {
    /// Destination chunk key.
    pub destination: ChunkKey,
    /// Source chunk key drawn for it.
    pub source: ChunkKey,
}

/// Bootstrapped table plus the draws that produced it.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    table: TimeTable,
    draws: Vec<ChunkDraw>,
}

impl BootstrapResult {
    pub(crate) fn new(table: TimeTable, draws: Vec<ChunkDraw>) -> Self {
        Self { table, draws }
    }

    /// Returns the output table, indexed by the destination index.
    pub fn table(&self) -> &TimeTable {
        &self.table
    }

    /// Returns the draws in destination order.
    pub fn draws(&self) -> &[ChunkDraw] {
        &self.draws
    }

    /// Consumes the result and returns the table.
    pub fn into_table(self) -> TimeTable {
        self.table
    }
}
