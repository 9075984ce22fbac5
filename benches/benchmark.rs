use criterion::{Criterion, criterion_group, criterion_main};
use rusqlite::{Connection, params};
use simventory::store::Store;
use simventory::walker::reconstruct_simulation;

const SIM: &str = "bench-sim";

/// A long derivation chain with a transfer per generation, the pathological
/// shape for traversal depth.
fn chain_log(generations: i64) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        CREATE TABLE Resources (SimID TEXT, ID INTEGER, TimeCreated INTEGER, Parent1 INTEGER, Parent2 INTEGER);
        CREATE TABLE Transactions (SimID TEXT, ID INTEGER, Time INTEGER, SenderID INTEGER, ReceiverID INTEGER);
        CREATE TABLE TransactedResources (SimID TEXT, TransactionID INTEGER, ResourceID INTEGER);
        CREATE TABLE ResCreators (SimID TEXT, ResID INTEGER, ModelID INTEGER);
        CREATE TABLE SimulationTimeInfo (SimID TEXT, SimulationStart INTEGER, Duration INTEGER);
        ",
    )
    .unwrap();
    conn.execute("INSERT INTO SimulationTimeInfo VALUES (?, 0, ?)", params![SIM, generations * 2])
        .unwrap();
    conn.execute("INSERT INTO Resources VALUES (?, 1, 0, 0, 0)", params![SIM]).unwrap();
    conn.execute("INSERT INTO ResCreators VALUES (?, 1, 10)", params![SIM]).unwrap();
    for g in 1..generations {
        let id = g + 1;
        conn.execute(
            "INSERT INTO Resources VALUES (?, ?, ?, ?, 0)",
            params![SIM, id, g * 2, id - 1],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO Transactions VALUES (?, ?, ?, 0, ?)",
            params![SIM, 1000 + g, g * 2 - 1, 100 + (g % 7)],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO TransactedResources VALUES (?, ?, ?)",
            params![SIM, 1000 + g, id - 1],
        )
        .unwrap();
    }
    conn
}

fn walk_chain(c: &mut Criterion) {
    let conn = chain_log(1_000);
    let store = Store::new(&conn);
    store.prepare_schema(true).unwrap();

    c.bench_function("walk_1k_generation_chain", |b| {
        b.iter(|| {
            store.prepare_schema(false).unwrap();
            reconstruct_simulation(&store, SIM, 100_000).unwrap()
        })
    });
}

criterion_group!(benches, walk_chain);
criterion_main!(benches);
