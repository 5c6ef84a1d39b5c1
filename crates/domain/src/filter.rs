//! Device filter — selects the devices a command applies to.
//!
//! All predicates must pass. Devices that pass every predicate except the
//! required-capability one can be diverted to a fallback list instead of
//! being dropped (e.g. on/off lamps next to dimmable ones). A device id is
//! selected at most once; repeated entries after the first are skipped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::device::{Capability, Device};
use crate::id::DeviceId;
use crate::zone::{ZoneScope, ZoneTree};

/// How device groups are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPolicy {
    /// No group filtering.
    #[default]
    Any,
    /// Target individual devices; skip group proxies.
    Members,
    /// Target group proxies; skip devices that belong to a group.
    Groups,
}

impl GroupPolicy {
    /// Policy matching the `use_group_instead` script setting.
    #[must_use]
    pub fn from_use_groups(use_group_instead: bool) -> Self {
        if use_group_instead {
            Self::Groups
        } else {
            Self::Members
        }
    }

    fn admits(self, device: &Device) -> bool {
        match self {
            Self::Any => true,
            Self::Members => !device.is_group_proxy(),
            Self::Groups => !device.group,
        }
    }
}

/// Devices selected by a [`DeviceFilter`], in discovery order.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Devices supporting every required capability.
    pub targets: Vec<Device>,
    /// Devices lacking a required capability but supporting the fallback one.
    pub fallback: Vec<Device>,
}

/// Composable device predicate set.
#[derive(Debug, Clone)]
pub struct DeviceFilter {
    class: Option<String>,
    required: Vec<Capability>,
    scope: ZoneScope,
    ignore: Vec<String>,
    groups: GroupPolicy,
    fallback: Option<Capability>,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            class: None,
            required: Vec::new(),
            scope: ZoneScope::All,
            ignore: Vec::new(),
            groups: GroupPolicy::default(),
            fallback: None,
        }
    }
}

impl DeviceFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep devices whose class or virtual class equals `class`.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Keep devices supporting `capability` (cumulative).
    #[must_use]
    pub fn require(mut self, capability: Capability) -> Self {
        self.required.push(capability);
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: ZoneScope) -> Self {
        self.scope = scope;
        self
    }

    /// Skip devices whose id or name is in `ignore`.
    #[must_use]
    pub fn ignore(mut self, ignore: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignore.extend(ignore.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn groups(mut self, groups: GroupPolicy) -> Self {
        self.groups = groups;
        self
    }

    /// Divert devices that lack a required capability but support
    /// `capability` into [`FilterOutcome::fallback`].
    #[must_use]
    pub fn fallback(mut self, capability: Capability) -> Self {
        self.fallback = Some(capability);
        self
    }

    /// Run the filter over `devices`.
    #[must_use]
    pub fn apply<'a>(
        &self,
        devices: impl IntoIterator<Item = &'a Device>,
        tree: &ZoneTree,
    ) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        let mut seen: HashSet<&DeviceId> = HashSet::new();
        for device in devices {
            if !self.admits(device, tree) {
                continue;
            }
            if !seen.insert(&device.id) {
                continue;
            }
            if device.has_capabilities(&self.required) {
                outcome.targets.push(device.clone());
            } else if self
                .fallback
                .as_ref()
                .is_some_and(|cap| device.has_capability(cap))
            {
                outcome.fallback.push(device.clone());
            }
        }
        outcome
    }

    /// Every predicate except the required capabilities.
    fn admits(&self, device: &Device, tree: &ZoneTree) -> bool {
        if let Some(class) = &self.class {
            if !device.is_class(class) {
                return false;
            }
        }
        if self
            .ignore
            .iter()
            .any(|entry| entry == device.id.as_str() || *entry == device.name)
        {
            return false;
        }
        if !self.scope.contains(&device.zone, tree) {
            return false;
        }
        self.groups.admits(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ZoneId;
    use crate::zone::{Zone, ZoneResolver};

    fn tree() -> ZoneTree {
        ZoneTree::new(vec![
            Zone::builder().id("1").name("Kitchen").build().unwrap(),
            Zone::builder()
                .id("2")
                .name("Kitchen-Sub")
                .parent("1")
                .build()
                .unwrap(),
            Zone::builder().id("3").name("Hallway").build().unwrap(),
        ])
    }

    fn light(id: &str, zone: &str, dimmable: bool) -> Device {
        let builder = Device::builder()
            .id(id)
            .name(format!("Light {id}"))
            .zone(zone)
            .class("light")
            .value(Capability::ONOFF, false);
        if dimmable {
            builder.value(Capability::DIM, 0.5)
        } else {
            builder
        }
        .build()
        .unwrap()
    }

    fn ids(devices: &[Device]) -> Vec<&str> {
        devices.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn should_preserve_discovery_order() {
        let devices = vec![light("c", "1", true), light("a", "1", true), light("b", "3", true)];
        let outcome = DeviceFilter::new()
            .class("light")
            .require(Capability::DIM)
            .apply(&devices, &tree());
        assert_eq!(ids(&outcome.targets), vec!["c", "a", "b"]);
    }

    #[test]
    fn should_target_each_device_once_when_ids_repeat() {
        let devices = vec![
            light("a", "1", true),
            light("b", "1", false),
            light("a", "1", true),
            light("b", "1", false),
        ];
        let outcome = DeviceFilter::new()
            .require(Capability::DIM)
            .fallback(Capability::ONOFF)
            .apply(&devices, &tree());
        assert_eq!(ids(&outcome.targets), vec!["a"]);
        assert_eq!(ids(&outcome.fallback), vec!["b"]);
    }

    #[test]
    fn should_skip_devices_of_other_classes() {
        let sensor = Device::builder()
            .id("s")
            .name("Motion")
            .zone("1")
            .class("sensor")
            .build()
            .unwrap();
        let devices = vec![sensor, light("l", "1", true)];
        let outcome = DeviceFilter::new().class("light").apply(&devices, &tree());
        assert_eq!(ids(&outcome.targets), vec!["l"]);
    }

    #[test]
    fn should_skip_ignored_devices_by_id_or_name() {
        let devices = vec![light("a", "1", true), light("b", "1", true), light("c", "1", true)];
        let outcome = DeviceFilter::new()
            .ignore(["a", "Light b"])
            .apply(&devices, &tree());
        assert_eq!(ids(&outcome.targets), vec!["c"]);
    }

    #[test]
    fn should_match_subzones_when_scope_is_subtree() {
        let tree = tree();
        let devices = vec![light("a", "2", true), light("b", "3", true)];
        let scope = ZoneResolver::new(&tree).scope(&["Kitchen"], true);
        let outcome = DeviceFilter::new().scope(scope).apply(&devices, &tree);
        assert_eq!(ids(&outcome.targets), vec!["a"]);
    }

    #[test]
    fn should_match_literal_zone_name_when_scope_is_named() {
        let tree = tree();
        let devices = vec![light("a", "2", true), light("b", "1", true)];
        let scope = ZoneResolver::new(&tree).scope(&["Kitchen"], false);
        let outcome = DeviceFilter::new().scope(scope).apply(&devices, &tree);
        assert_eq!(ids(&outcome.targets), vec!["b"]);
    }

    #[test]
    fn should_skip_device_in_unknown_zone_when_scoped_by_name() {
        let tree = tree();
        let devices = vec![light("a", "missing", true)];
        let scope = ZoneScope::Named(vec!["Kitchen".to_string()]);
        let outcome = DeviceFilter::new().scope(scope).apply(&devices, &tree);
        assert!(outcome.targets.is_empty());
        assert!(ZoneScope::All.contains(&ZoneId::from("missing"), &tree));
    }

    #[test]
    fn should_divert_devices_missing_capability_to_fallback() {
        let devices = vec![light("dim", "1", true), light("plain", "1", false)];
        let outcome = DeviceFilter::new()
            .require(Capability::DIM)
            .fallback(Capability::ONOFF)
            .apply(&devices, &tree());
        assert_eq!(ids(&outcome.targets), vec!["dim"]);
        assert_eq!(ids(&outcome.fallback), vec!["plain"]);
    }

    #[test]
    fn should_drop_devices_missing_capability_without_fallback() {
        let devices = vec![light("plain", "1", false)];
        let outcome = DeviceFilter::new()
            .require(Capability::DIM)
            .apply(&devices, &tree());
        assert!(outcome.targets.is_empty());
        assert!(outcome.fallback.is_empty());
    }

    #[test]
    fn should_apply_complementary_group_policies() {
        let mut proxy = light("proxy", "1", true);
        proxy.driver_id = "homey:virtualdrivergroup".to_string();
        let mut member = light("member", "1", true);
        member.group = true;
        let single = light("single", "1", true);
        let devices = vec![proxy, member, single];

        let members = DeviceFilter::new()
            .groups(GroupPolicy::from_use_groups(false))
            .apply(&devices, &tree());
        assert_eq!(ids(&members.targets), vec!["member", "single"]);

        let groups = DeviceFilter::new()
            .groups(GroupPolicy::from_use_groups(true))
            .apply(&devices, &tree());
        assert_eq!(ids(&groups.targets), vec!["proxy", "single"]);
    }
}
