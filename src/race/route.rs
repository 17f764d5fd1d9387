// src/race/route.rs
// =============================================================================
// The route table: for every page the search has discovered, the shortest
// known path from the start page to it.
//
// Instead of storing a full Vec<String> per page we store the page it was
// discovered from, and rebuild the path on demand by walking back to the
// start. Same answers, far less copying on big wikis.
//
// Invariants:
// - the start page is always present
// - every route begins with the start page and ends with the key
// - once a page is in the table its route never changes (first discovery
//   is the shortest, because BFS discovers pages in distance order)
// =============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct RouteTable {
    // page -> page it was first discovered from (None for the start page)
    parents: HashMap<String, Option<String>>,
}

impl RouteTable {
    pub fn new(start: &str) -> Self {
        let mut parents = HashMap::new();
        parents.insert(start.to_string(), None);
        Self { parents }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.parents.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    // Records that `to` was reached from the already-routed `from`
    //
    // This is the only way into the table. Returns false (and changes
    // nothing) if `to` already has a route.
    pub fn discover(&mut self, from: &str, to: &str) -> bool {
        debug_assert!(self.contains(from), "discovering from an unrouted page");
        match self.parents.entry(to.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Some(from.to_string()));
                true
            }
        }
    }

    // The full path start -> ... -> address, or None if it was never discovered
    pub fn route(&self, address: &str) -> Option<Vec<String>> {
        let mut path = vec![address.to_string()];
        let mut cursor = self.parents.get(address)?;
        while let Some(parent) = cursor {
            path.push(parent.clone());
            cursor = self.parents.get(parent.as_str())?;
        }
        path.reverse();
        Some(path)
    }

    // The route to `from` with `to` appended, without recording `to`
    pub fn route_via(&self, from: &str, to: &str) -> Vec<String> {
        let mut path = self.route(from).unwrap_or_default();
        path.push(to.to_string());
        path
    }
}
