use std::collections::HashSet;

use tracing::info;

use crate::error::Result;
use crate::model::{IdHasher, OPEN_END, ResourceId, Segment};
use crate::sink::SegmentSink;
use crate::store::{SimScope, Store};

/// Depth-first lineage walker for one simulation id.
///
/// Starting from the simulation-initial resources, the walker follows
/// derivation edges downward. For each resource it resolves the retirement
/// time (earliest derivation child's creation, or open if there are none),
/// merges the resource's ownership-change timeline into non-overlapping
/// segments, and hands them to the sink. Children are then queued with the
/// owner in effect at the parent's retirement as their inherited owner.
///
/// Derivation chains can get long, so the traversal runs on an explicit
/// work stack rather than native recursion. The visited set guarantees a
/// resource reachable through both parent slots of a combination (or via a
/// malformed cyclic edge) is processed exactly once; re-entry is silently
/// skipped rather than reported.
pub struct Walker<'a, 'db> {
    scope: &'a mut SimScope<'db>,
    visited: HashSet<ResourceId, IdHasher>,
}

impl<'a, 'db> Walker<'a, 'db> {
    pub fn new(scope: &'a mut SimScope<'db>) -> Walker<'a, 'db> {
        Walker { scope, visited: HashSet::default() }
    }

    /// Walks every lineage rooted in `roots`, emitting all ownership
    /// segments into `sink`. Returns the number of resources processed.
    ///
    /// Any store failure aborts the whole walk; segments already committed
    /// by the sink remain in place.
    pub fn walk(&mut self, roots: Vec<Segment>, sink: &mut SegmentSink<'db>) -> Result<usize> {
        let mut stack = roots;
        stack.reverse();
        let mut resources = 0usize;

        while let Some(mut node) = stack.pop() {
            if !self.visited.insert(node.resource) {
                continue;
            }
            resources += 1;

            let children = self.scope.children(node.resource)?;
            // children are ordered by creation time, so the first one marks
            // this resource's retirement
            let retirement = children.first().map(|&(_, t)| t).unwrap_or(OPEN_END);
            let changes = self.scope.owner_changes(node.resource, node.owner)?;

            // the owner in effect at retirement, inherited by every child
            let heir = changes.last().map(|c| c.owner).unwrap_or(node.owner);

            // the resource's own segment runs from its creation to the first
            // ownership change, or straight to retirement if it never moved
            let resource = node.resource;
            node.end = changes.first().map(|c| c.time).unwrap_or(retirement);
            sink.push(node)?;

            // one synthetic segment per ownership change, each bounded by
            // the next change or by retirement
            for (i, change) in changes.iter().enumerate() {
                let end = changes.get(i + 1).map(|c| c.time).unwrap_or(retirement);
                sink.push(Segment { resource, owner: change.owner, start: change.time, end })?;
            }

            // pushed in reverse so children pop in creation-time order
            for &(child, created) in children.iter().rev() {
                stack.push(Segment::open(child, heir, created));
            }
        }
        Ok(resources)
    }
}

/// Outcome of one simulation's reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub resources: usize,
    pub segments: usize,
}

/// Reconstructs the full inventory for one simulation id: materializes the
/// resource subset, walks every root lineage, and commits the segments in
/// batches of `batch_size`.
pub fn reconstruct_simulation(store: &Store<'_>, simid: &str, batch_size: usize) -> Result<RunSummary> {
    let mut scope = store.scope(simid)?;
    let roots = store.roots(simid)?;
    info!(simid, roots = roots.len(), "walking resource lineages");

    let mut sink = store.sink(simid, batch_size)?;
    let mut walker = Walker::new(&mut scope);
    let resources = walker.walk(roots, &mut sink)?;
    let segments = sink.finish()?;
    scope.discard()?;

    Ok(RunSummary { resources, segments })
}
