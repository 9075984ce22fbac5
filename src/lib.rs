//! Simventory – reconstructs per-agent resource inventories from a
//! discrete-event simulation's transaction log.
//!
//! A finished simulation leaves behind a SQLite log of every resource it
//! created and every transaction that moved one between agents. Resources
//! split and combine over time, forming a derivation DAG: a child resource
//! records up to two parent ids, a parent may have many children. What the
//! log does *not* contain is the answer to "who held what, when" — that has
//! to be reconstructed by walking each lineage from its simulation-initial
//! root and interleaving the derivation boundaries with the
//! ownership-change timeline.
//!
//! The output is the `Inventories` table: one row per *ownership segment*
//! `(SimID, ResID, AgentID, StartTime, EndTime)`. For each resource the
//! segments partition `[creation, retirement)` with no gaps or overlaps,
//! where retirement is the creation time of the earliest derivation child,
//! or an open sentinel when the resource is still extant at simulation end.
//!
//! ## Modules
//! * [`model`] – Identifier aliases, the [`model::Segment`] output unit and
//!   the open-end sentinel.
//! * [`store`] – SQLite adapter: schema/index preparation, root enumeration,
//!   and the per-simulation [`store::SimScope`] holding the hot-path
//!   prepared statements over a materialized resource subset.
//! * [`walker`] – The lineage walker: explicit-stack depth-first traversal
//!   with a visited guard, plus [`walker::reconstruct_simulation`] tying the
//!   pieces together for one simulation id.
//! * [`sink`] – Batched, transactional writer for emitted segments.
//! * [`settings`] – Run tunables via a config file / environment.
//! * [`error`] – The [`error::SimventoryError`] taxonomy.
//!
//! ## Quick Start
//! ```no_run
//! use rusqlite::Connection;
//! use simventory::{store::Store, walker::reconstruct_simulation};
//! let conn = Connection::open("simulation-log.sqlite").unwrap();
//! let store = Store::new(&conn);
//! store.prepare_schema(true).unwrap();
//! for simid in store.sim_ids().unwrap() {
//!     let summary = reconstruct_simulation(&store, &simid, 100_000).unwrap();
//!     println!("{simid}: {} resources, {} segments", summary.resources, summary.segments);
//! }
//! store.finish().unwrap();
//! ```
//!
//! ## Failure model
//! Any store failure aborts the current simulation id's walk and surfaces
//! as an error; the driver logs it and moves on to the next simulation id.
//! Batches already committed by the sink stay in place — the job is an
//! offline, re-runnable batch step, so recovery is "clear and re-run".

pub mod error;
pub mod model;
pub mod settings;
pub mod sink;
pub mod store;
pub mod walker;
