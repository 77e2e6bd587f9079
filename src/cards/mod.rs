//! Card system: templates, instances, and the registry.
//!
//! ## Key Types
//!
//! - `Card`: immutable template compiled from card text
//! - `CardInstance`: a copy of a template in a game (zone, damage, flags)
//! - `CardRegistry`: templates by name, plus the shared `BuiltinAbilities`

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    Card, CardKind, CardType, Color, CostType, Essence, Keyword, Quantity, Stats, SubType,
};
pub use instance::{CardInstance, Modifier};
pub use registry::{BuiltinAbilities, CardRegistry, LoadError, RegistryError};
