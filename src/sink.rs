use rusqlite::{Connection, Statement, params};
use tracing::debug;

use crate::error::{Result, SimventoryError};
use crate::model::{Segment, SimId};

const INSERT_SQL: &str = "INSERT INTO Inventories VALUES (?, ?, ?, ?, ?)";

/// Batching writer for ownership segments.
///
/// Segments accumulate in memory and are committed in one transaction per
/// batch, bounding memory and giving the run coarse checkpoints. A failed
/// commit is fatal to the simulation's run and is not retried; batches
/// already committed stay in place, since the job is offline and re-runnable
/// from a cleared table.
pub struct SegmentSink<'db> {
    db: &'db Connection,
    insert: Statement<'db>,
    simid: SimId,
    pending: Vec<Segment>,
    batch_size: usize,
    committed: usize,
}

impl<'db> SegmentSink<'db> {
    pub fn new(db: &'db Connection, simid: SimId, batch_size: usize) -> Result<SegmentSink<'db>> {
        let insert = db
            .prepare(INSERT_SQL)
            .map_err(|e| SimventoryError::Schema(e.to_string()))?;
        Ok(SegmentSink { db, insert, simid, pending: Vec::new(), batch_size, committed: 0 })
    }

    /// Accepts one segment, flushing when the accumulator reaches the
    /// configured batch size.
    pub fn push(&mut self, segment: Segment) -> Result<()> {
        self.pending.push(segment);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.db.execute_batch("BEGIN TRANSACTION;")?;
        for segment in &self.pending {
            if let Err(e) = self.insert.execute(params![
                self.simid,
                segment.resource,
                segment.owner,
                segment.start,
                segment.end
            ]) {
                let _ = self.db.execute_batch("ROLLBACK;");
                return Err(e.into());
            }
        }
        self.db.execute_batch("COMMIT;")?;
        self.committed += self.pending.len();
        debug!(simid = %self.simid, committed = self.committed, "flushed segment batch");
        self.pending.clear();
        Ok(())
    }

    /// Commits any remainder and returns the total number of segments
    /// written. An empty remainder is a no-op.
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.committed)
    }
}
