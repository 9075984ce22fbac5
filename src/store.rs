// used for persistence
use rusqlite::{Connection, Statement, params};
use tracing::{debug, info, warn};

use crate::error::{Result, SimventoryError};
use crate::model::{AgentId, OwnerChange, ResourceId, Segment, SimId, Timestep};
use crate::sink::SegmentSink;

const INVENTORIES_DDL: &str = "
    DROP TABLE IF EXISTS Inventories;
    CREATE TABLE Inventories (
        SimID TEXT,
        ResID INTEGER,
        AgentID INTEGER,
        StartTime INTEGER,
        EndTime INTEGER
    );
";

const SIM_IDS_SQL: &str = "SELECT SimID FROM SimulationTimeInfo";

const ROOTS_SQL: &str = "
    SELECT res.ID, res.TimeCreated, rc.ModelID
        FROM Resources AS res
        INNER JOIN ResCreators AS rc
        ON res.ID = rc.ResID
        WHERE res.SimID = ?1 AND rc.SimID = ?1
";

const OWNERS_SQL: &str = "
    SELECT tr.ReceiverID, tr.Time
        FROM Transactions AS tr
        INNER JOIN TransactedResources AS trr
        ON tr.ID = trr.TransactionID
        WHERE trr.ResourceID = ?1 AND tr.SimID = ?2 AND trr.SimID = ?2
        ORDER BY tr.Time ASC
";

/// `CREATE INDEX IF NOT EXISTS` statement over the given columns, ascending.
fn index_sql(table: &str, cols: &[&str]) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {}_{} ON {} ({} ASC);",
        table,
        cols.join("_"),
        table,
        cols.join(" ASC,")
    )
}

/// Indexes on the consumed log tables that make the hot-path lookups viable.
fn input_indexes() -> Vec<String> {
    vec![
        index_sql("Resources", &["SimID", "ID"]),
        index_sql("Resources", &["Parent1"]),
        index_sql("Resources", &["Parent2"]),
        index_sql("Transactions", &["ID"]),
        index_sql("Transactions", &["Time"]),
        index_sql("Transactions", &["ReceiverID"]),
        index_sql("TransactedResources", &["TransactionID"]),
        index_sql("TransactedResources", &["ResourceID"]),
        index_sql("ResCreators", &["SimID", "ResID"]),
    ]
}

/// Indexes on the produced table, built after all simulations are done so
/// they do not slow down the batched inserts.
fn output_indexes() -> Vec<String> {
    vec![
        index_sql("Inventories", &["SimID", "AgentID"]),
        index_sql("Inventories", &["SimID", "StartTime"]),
        index_sql("Inventories", &["SimID", "EndTime"]),
    ]
}

// ------------- Store adapter -------------

/// Thin adapter around the simulation log database. The log tables are read
/// only; the one table this tool owns is `Inventories`.
pub struct Store<'db> {
    pub db: &'db Connection,
}

impl<'db> Store<'db> {
    pub fn new(db: &'db Connection) -> Store<'db> {
        Store { db }
    }

    /// Recreates the `Inventories` table and builds the input indexes.
    ///
    /// Index creation failures are logged and tolerated: trimmed logs may
    /// lack some tables, and every statement is `IF NOT EXISTS`. A failure
    /// to (re)create `Inventories` itself is fatal.
    pub fn prepare_schema(&self, build_indexes: bool) -> Result<()> {
        self.db
            .execute_batch(INVENTORIES_DDL)
            .map_err(|e| SimventoryError::Schema(e.to_string()))?;
        if build_indexes {
            info!("creating input indexes");
            for sql in input_indexes() {
                if let Err(e) = self.db.execute_batch(&sql) {
                    warn!(error = %e, "input index skipped");
                }
            }
        }
        Ok(())
    }

    /// Builds the post-load indexes on `Inventories`.
    pub fn finish(&self) -> Result<()> {
        info!("creating inventory indexes");
        for sql in output_indexes() {
            self.db.execute_batch(&sql)?;
        }
        Ok(())
    }

    /// Every simulation id recorded in the log.
    pub fn sim_ids(&self) -> Result<Vec<SimId>> {
        let mut stmt = self
            .db
            .prepare(SIM_IDS_SQL)
            .map_err(|e| SimventoryError::Schema(e.to_string()))?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    /// Root enumerator: every resource registered as simulation-initial for
    /// `simid`, with its creation time and creating agent as initial owner.
    /// An empty result is valid (a run with no roots produces no output).
    pub fn roots(&self, simid: &str) -> Result<Vec<Segment>> {
        let mut stmt = self.db.prepare(ROOTS_SQL)?;
        let mut rows = stmt.query(params![simid])?;
        let mut roots = Vec::new();
        while let Some(row) = rows.next()? {
            roots.push(Segment::open(row.get(0)?, row.get(2)?, row.get(1)?));
        }
        Ok(roots)
    }

    /// Materializes the per-simulation resource subset and prepares the
    /// hot-path statements against it.
    pub fn scope(&self, simid: &str) -> Result<SimScope<'db>> {
        SimScope::new(self.db, simid)
    }

    /// A batching sink writing `Inventories` rows for one simulation.
    pub fn sink(&self, simid: &str, batch_size: usize) -> Result<SegmentSink<'db>> {
        SegmentSink::new(self.db, simid.to_owned(), batch_size)
    }
}

// ------------- Per-simulation scope -------------

/// Hot-path accessors for one simulation id.
///
/// The derivation-children lookup runs hundreds of thousands of times per
/// walk, so it targets a simulation-scoped copy of `Resources` indexed on
/// both parent columns; a full-table scan per call would make the traversal
/// practically non-terminating on real-sized logs.
pub struct SimScope<'db> {
    db: &'db Connection,
    simid: SimId,
    table: String,
    children: Statement<'db>,
    owners: Statement<'db>,
}

impl<'db> SimScope<'db> {
    fn new(db: &'db Connection, simid: &str) -> Result<SimScope<'db>> {
        let table = format!("tmp_restbl_{}", simid.replace('-', "_"));
        debug!(%table, "materializing resource subset");
        db.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
        db.execute(
            &format!(
                "CREATE TABLE {table} AS
                     SELECT ID, TimeCreated, Parent1, Parent2
                     FROM Resources WHERE SimID = ?"
            ),
            params![simid],
        )
        .map_err(|e| SimventoryError::Schema(e.to_string()))?;
        db.execute_batch(&index_sql(&table, &["Parent1"]))?;
        db.execute_batch(&index_sql(&table, &["Parent2"]))?;

        let children = db
            .prepare(&format!(
                "SELECT ID, TimeCreated FROM {table}
                     WHERE Parent1 = ?1 OR Parent2 = ?1
                     ORDER BY TimeCreated ASC"
            ))
            .map_err(|e| SimventoryError::Schema(e.to_string()))?;
        let owners = db
            .prepare(OWNERS_SQL)
            .map_err(|e| SimventoryError::Schema(e.to_string()))?;

        Ok(SimScope { db, simid: simid.to_owned(), table, children, owners })
    }

    /// Resource graph accessor: direct derivation children of `id`, ordered
    /// by creation time ascending. Empty for leaf resources.
    pub fn children(&mut self, id: ResourceId) -> Result<Vec<(ResourceId, Timestep)>> {
        let mut rows = self.children.query(params![id])?;
        let mut kids = Vec::new();
        while let Some(row) = rows.next()? {
            kids.push((row.get(0)?, row.get(1)?));
        }
        Ok(kids)
    }

    /// Ownership timeline accessor: the filtered `(owner, time)` events for
    /// `id`, time ascending, starting from `current` as the owner in effect
    /// at creation.
    ///
    /// An event naming the owner already in effect at that instant is a
    /// no-op and is suppressed. That covers both an agent recorded as
    /// transferring a resource to itself and consecutive duplicate
    /// receivers; keeping such events would emit zero-duration phantom
    /// segments that double-count inventory.
    pub fn owner_changes(&mut self, id: ResourceId, current: AgentId) -> Result<Vec<OwnerChange>> {
        let mut rows = self.owners.query(params![id, self.simid])?;
        let mut changes: Vec<OwnerChange> = Vec::new();
        let mut holder = current;
        while let Some(row) = rows.next()? {
            let change = OwnerChange { owner: row.get(0)?, time: row.get(1)? };
            if change.owner == holder {
                continue;
            }
            holder = change.owner;
            changes.push(change);
        }
        Ok(changes)
    }

    /// Drops the materialized subset after a successful walk.
    pub fn discard(self) -> Result<()> {
        debug!(table = %self.table, "dropping resource subset");
        self.db.execute_batch(&format!("DROP TABLE {};", self.table))?;
        Ok(())
    }
}
