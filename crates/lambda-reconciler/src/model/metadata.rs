//! Property metadata: which lifecycle phases each function property takes part in.
//!
//! [`METADATA`] answers "what kind of remote call does changing property X require".
//! The dispatcher and the create request builder route through this table rather than
//! through per-property code paths.

use std::fmt;

/// A lifecycle phase a property can participate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Identity of the remote resource. Set once, never updated.
    Key,
    /// Sent with the create call.
    Create,
    /// Changed through the update-configuration call.
    UpdateConfig,
    /// Changed through the replace-code call.
    UpdateCode,
    /// Changed by creating trigger bindings.
    UpdateTriggers,
}

/// A property of a function's desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    FunctionName,
    Runtime,
    Handler,
    Role,
    Code,
    Description,
    Timeout,
    MemorySize,
    VpcConfig,
    Streams,
}

/// Property -> phases. Exactly one entry per [`Property`].
pub const METADATA: &[(Property, &[Phase])] = &[
    (Property::FunctionName, &[Phase::Key, Phase::Create]),
    (Property::Runtime, &[Phase::Create, Phase::UpdateConfig]),
    (Property::Handler, &[Phase::Create, Phase::UpdateConfig]),
    (Property::Role, &[Phase::Create, Phase::UpdateConfig]),
    (Property::Code, &[Phase::Create, Phase::UpdateCode]),
    (Property::Description, &[Phase::UpdateConfig]),
    (Property::Timeout, &[Phase::UpdateConfig]),
    (Property::MemorySize, &[Phase::UpdateConfig]),
    (Property::VpcConfig, &[Phase::UpdateConfig]),
    (Property::Streams, &[Phase::UpdateTriggers]),
];

impl Property {
    pub const ALL: [Property; 10] = [
        Property::FunctionName,
        Property::Runtime,
        Property::Handler,
        Property::Role,
        Property::Code,
        Property::Description,
        Property::Timeout,
        Property::MemorySize,
        Property::VpcConfig,
        Property::Streams,
    ];

    /// The phases this property participates in, in table order.
    pub fn phases(self) -> &'static [Phase] {
        METADATA
            .iter()
            .find(|(property, _)| *property == self)
            .map(|(_, phases)| *phases)
            .unwrap_or(&[])
    }

    pub fn has_phase(self, phase: Phase) -> bool {
        self.phases().contains(&phase)
    }

    /// Wire name of the property.
    pub fn name(self) -> &'static str {
        match self {
            Property::FunctionName => "function_name",
            Property::Runtime => "runtime",
            Property::Handler => "handler",
            Property::Role => "role",
            Property::Code => "code",
            Property::Description => "description",
            Property::Timeout => "timeout",
            Property::MemorySize => "memory_size",
            Property::VpcConfig => "vpc_config",
            Property::Streams => "streams",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every property tagged with `phase`, in table order. Empty when no property carries it.
pub fn properties_with(phase: Phase) -> impl Iterator<Item = Property> {
    METADATA
        .iter()
        .filter(move |(_, phases)| phases.contains(&phase))
        .map(|(property, _)| *property)
}
