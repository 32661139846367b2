//! Pure data: desired state, observed state, change sets and the property metadata table.

pub mod changes;
pub mod function;
pub mod metadata;
pub mod observed;

pub use changes::{Change, FunctionChanges};
pub use function::{CodeSource, FunctionSpec, VpcConfig};
pub use metadata::{properties_with, Phase, Property, METADATA};
pub use observed::{FunctionConfiguration, ObservedFunction};
