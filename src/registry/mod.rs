//! Installed Plugin Registry
//!
//! Bookkeeping for plugins installed into a host tool. Each plugin is
//! identified by `(name, apiVersion, slot)` and rendered as a coordinate
//! string `name:version:slot`; the registry persists the installed set to
//! a local file and gates activation through a major.minor API
//! compatibility check.

pub mod alias;
pub mod compat;
pub mod entry;
pub mod error;
pub mod store;

pub use alias::{Alias, AliasResolver};
pub use compat::{is_api_compatible, ApiVersion};
pub use entry::PluginEntry;
pub use error::{RegistryError, RegistryResult};
pub use store::{default_registry_path, InstalledPluginRegistry};
