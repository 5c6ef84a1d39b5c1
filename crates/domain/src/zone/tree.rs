//! Zone tree — parent/child index over a snapshot of zones.

use std::collections::{HashMap, HashSet};

use super::Zone;
use crate::id::ZoneId;

/// Read-only index over the zone hierarchy.
///
/// Built fresh from the zones fetched at the start of an invocation.
/// Zones keep their discovery order.
#[derive(Debug, Clone, Default)]
pub struct ZoneTree {
    zones: Vec<Zone>,
    index: HashMap<ZoneId, usize>,
    children: HashMap<ZoneId, Vec<ZoneId>>,
}

impl ZoneTree {
    /// Index the given zones. Later duplicates of an id replace earlier ones.
    #[must_use]
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut tree = Self::default();
        for zone in zones {
            if let Some(&pos) = tree.index.get(&zone.id) {
                tree.zones[pos] = zone;
            } else {
                tree.index.insert(zone.id.clone(), tree.zones.len());
                tree.zones.push(zone);
            }
        }
        for zone in &tree.zones {
            if let Some(parent) = &zone.parent {
                tree.children
                    .entry(parent.clone())
                    .or_default()
                    .push(zone.id.clone());
            }
        }
        tree
    }

    #[must_use]
    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.index.get(id).map(|&pos| &self.zones[pos])
    }

    /// Name of the zone with `id`, if it exists.
    #[must_use]
    pub fn name_of(&self, id: &ZoneId) -> Option<&str> {
        self.get(id).map(|zone| zone.name.as_str())
    }

    /// All zones in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Zones whose name equals `name` exactly, in discovery order.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.iter().filter(move |zone| zone.name == name)
    }

    /// Direct children of `id`.
    #[must_use]
    pub fn children(&self, id: &ZoneId) -> &[ZoneId] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    /// The given roots plus every zone below them.
    ///
    /// Breadth-first, level by level. A zone already in the result is never
    /// expanded again, so cycles in the parent links terminate.
    #[must_use]
    pub fn expand(&self, roots: impl IntoIterator<Item = ZoneId>) -> HashSet<ZoneId> {
        let mut visited: HashSet<ZoneId> = HashSet::new();
        let mut frontier: Vec<ZoneId> = roots
            .into_iter()
            .filter(|id| visited.insert(id.clone()))
            .collect();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in &frontier {
                for child in self.children(id) {
                    if visited.insert(child.clone()) {
                        next.push(child.clone());
                    }
                }
            }
            frontier = next;
        }
        visited
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
