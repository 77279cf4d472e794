use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a store.
///
/// Returned by [`crate::store::MemoryStore::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DbStats {
    pub countries: usize,
    pub regions: usize,
    pub cities: usize,
    pub prefixes: usize,
    pub prefix_links: usize,
}
