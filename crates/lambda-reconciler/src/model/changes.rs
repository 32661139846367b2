//! The change set produced by diffing a [`FunctionSpec`](super::FunctionSpec) against an
//! [`ObservedFunction`](super::ObservedFunction).

use super::function::{CodeSource, VpcConfig};
use super::metadata::Property;
use reconcile_framework::ChangeSet;
use std::collections::BTreeMap;

/// New value for one changed property.
///
/// There is no variant for the function name: the key never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Runtime(String),
    Handler(String),
    Role(String),
    Code(CodeSource),
    Description(String),
    Timeout(u32),
    MemorySize(u32),
    VpcConfig(VpcConfig),
    /// Stream ARNs to bind. Only additions; bindings are never removed.
    Streams(Vec<String>),
}

impl Change {
    pub fn property(&self) -> Property {
        match self {
            Change::Runtime(_) => Property::Runtime,
            Change::Handler(_) => Property::Handler,
            Change::Role(_) => Property::Role,
            Change::Code(_) => Property::Code,
            Change::Description(_) => Property::Description,
            Change::Timeout(_) => Property::Timeout,
            Change::MemorySize(_) => Property::MemorySize,
            Change::VpcConfig(_) => Property::VpcConfig,
            Change::Streams(_) => Property::Streams,
        }
    }
}

/// Property -> new value. A property present here really differs from the remote side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionChanges {
    entries: BTreeMap<Property, Change>,
}

impl FunctionChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `change`, replacing any earlier value for the same property.
    pub fn insert(&mut self, change: Change) {
        self.entries.insert(change.property(), change);
    }

    pub fn remove(&mut self, property: Property) -> Option<Change> {
        self.entries.remove(&property)
    }

    pub fn get(&self, property: Property) -> Option<&Change> {
        self.entries.get(&property)
    }

    pub fn contains(&self, property: Property) -> bool {
        self.entries.contains_key(&property)
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.entries.values()
    }
}

impl FromIterator<Change> for FunctionChanges {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut changes = FunctionChanges::new();
        for change in iter {
            changes.insert(change);
        }
        changes
    }
}

impl ChangeSet for FunctionChanges {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
