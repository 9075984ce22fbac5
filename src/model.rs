use core::hash::BuildHasherDefault;
use std::fmt;

use seahash::SeaHasher;

// ------------- Identifiers -------------
pub type ResourceId = i64;
pub type AgentId = i64;
pub type SimId = String;

/// Integer timestep of the simulated clock.
pub type Timestep = i32;

/// Sentinel end time for a resource that is still extant at simulation end.
pub const OPEN_END: Timestep = Timestep::MAX;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

/// One interval during which a single agent held a single resource.
///
/// Segments for one resource partition `[creation, retirement)` with no gaps
/// and no overlaps; the last segment of a resource with no derivation
/// children ends at [`OPEN_END`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub resource: ResourceId,
    pub owner: AgentId,
    pub start: Timestep,
    pub end: Timestep,
}

impl Segment {
    /// A segment whose end is not yet known (closed when the resource is
    /// visited and its retirement time is resolved).
    pub fn open(resource: ResourceId, owner: AgentId, start: Timestep) -> Self {
        Self { resource, owner, start, end: OPEN_END }
    }
    pub fn is_open(&self) -> bool {
        self.end == OPEN_END
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open() {
            write!(f, "res {} @ agent {} [{}, open)", self.resource, self.owner, self.start)
        } else {
            write!(f, "res {} @ agent {} [{}, {})", self.resource, self.owner, self.start, self.end)
        }
    }
}

/// One filtered ownership-change event: `owner` received the resource at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerChange {
    pub owner: AgentId,
    pub time: Timestep,
}
