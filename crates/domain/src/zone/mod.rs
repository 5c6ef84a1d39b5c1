//! Zone — a hierarchical location node (house, floor, room) holding devices.
//!
//! Zones form a forest through their optional `parent`. Names are not unique
//! across the hierarchy, and the hub does not guarantee the absence of
//! cycles, so every traversal in [`tree`] tracks visited identifiers.

mod activity;
mod resolver;
mod tree;

pub use activity::ActivityOrigin;
pub use resolver::{NameMatch, ZoneResolver, ZoneScope};
pub use tree::ZoneTree;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ZoneHubError};
use crate::id::ZoneId;

/// A location node in the zone hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<ZoneId>,
    /// Whether the hub currently considers the zone active (motion, contact, …).
    #[serde(default)]
    pub active: bool,
    /// Raw origin URIs explaining why the zone is active.
    #[serde(default)]
    pub active_origins: Vec<String>,
}

impl Zone {
    /// Create a builder for constructing a [`Zone`].
    #[must_use]
    pub fn builder() -> ZoneBuilder {
        ZoneBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Validation`] when `name` is empty or the zone
    /// names itself as its parent.
    pub fn validate(&self) -> Result<(), ZoneHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.parent.as_ref() == Some(&self.id) {
            return Err(ValidationError::SelfParent.into());
        }
        Ok(())
    }

    /// Parsed activity origins; origins that cannot be parsed are skipped.
    pub fn activity_origins(&self) -> impl Iterator<Item = ActivityOrigin> + '_ {
        self.active_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
    }
}

/// Step-by-step builder for [`Zone`].
#[derive(Debug, Default)]
pub struct ZoneBuilder {
    id: Option<ZoneId>,
    name: Option<String>,
    parent: Option<ZoneId>,
    active: bool,
    active_origins: Vec<String>,
}

impl ZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<ZoneId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn parent(mut self, parent: impl Into<ZoneId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn active_origin(mut self, origin: impl Into<String>) -> Self {
        self.active_origins.push(origin.into());
        self
    }

    /// Consume the builder, validate, and return a [`Zone`].
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Zone, ZoneHubError> {
        let zone = Zone {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            parent: self.parent,
            active: self.active,
            active_origins: self.active_origins,
        };
        zone.validate()?;
        Ok(zone)
    }
}
