//! Zone resolver — turns user-supplied zone names into zone identifiers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ZoneTree;
use crate::id::ZoneId;

/// How to treat several zones sharing the requested name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Every zone with the name matches.
    #[default]
    All,
    /// Only the first zone with the name (in discovery order) matches.
    First,
}

/// Which devices a zone filter lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneScope {
    /// No zone names given: every zone.
    All,
    /// The device's zone *name* must be one of these.
    Named(Vec<String>),
    /// The device's zone *id* must be in this set.
    Subtree(HashSet<ZoneId>),
}

impl ZoneScope {
    /// Whether a device in `zone_id` is inside this scope.
    #[must_use]
    pub fn contains(&self, zone_id: &ZoneId, tree: &ZoneTree) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => tree
                .name_of(zone_id)
                .is_some_and(|name| names.iter().any(|n| n == name)),
            Self::Subtree(ids) => ids.contains(zone_id),
        }
    }
}

/// Resolves zone names against a [`ZoneTree`].
#[derive(Debug, Clone, Copy)]
pub struct ZoneResolver<'a> {
    tree: &'a ZoneTree,
    name_match: NameMatch,
}

impl<'a> ZoneResolver<'a> {
    #[must_use]
    pub fn new(tree: &'a ZoneTree) -> Self {
        Self {
            tree,
            name_match: NameMatch::default(),
        }
    }

    #[must_use]
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    /// Identifiers of zones named in `names`, plus all their descendants
    /// when `include_descendants` is set.
    ///
    /// A name matching no zone contributes nothing; it is not an error.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        include_descendants: bool,
    ) -> HashSet<ZoneId> {
        let matched: Vec<ZoneId> = names
            .iter()
            .flat_map(|name| self.matching(name.as_ref()))
            .collect();

        if include_descendants {
            self.tree.expand(matched)
        } else {
            matched.into_iter().collect()
        }
    }

    /// The filter scope for `names`.
    ///
    /// With descendants, membership is decided by resolved zone id. Without,
    /// it is decided by the literal name of the device's zone, unless
    /// [`NameMatch::First`] narrows each name to a single zone id.
    #[must_use]
    pub fn scope<S: AsRef<str>>(&self, names: &[S], include_descendants: bool) -> ZoneScope {
        if names.is_empty() {
            return ZoneScope::All;
        }
        match (include_descendants, self.name_match) {
            (true, _) => ZoneScope::Subtree(self.resolve(names, true)),
            (false, NameMatch::First) => ZoneScope::Subtree(self.resolve(names, false)),
            (false, NameMatch::All) => {
                ZoneScope::Named(names.iter().map(|n| n.as_ref().to_string()).collect())
            }
        }
    }

    fn matching(&self, name: &str) -> Vec<ZoneId> {
        let mut found = self.tree.named(name).map(|zone| zone.id.clone());
        match self.name_match {
            NameMatch::All => found.collect(),
            NameMatch::First => found.next().into_iter().collect(),
        }
    }
}
