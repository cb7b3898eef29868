//! Collaborator implementations: template sources and artifact stores.
//!
//! [`MemoryStore`] and [`StaticTemplates`] back tests and one-shot runs;
//! [`FsStore`] and [`DirTemplates`] are the CLI defaults; [`HttpTemplates`]
//! talks to a remote template service and is gated behind the `remote`
//! feature.

mod fs;
#[cfg(feature = "remote")]
mod http;
mod memory;

pub use fs::{DirTemplates, FsStore};
#[cfg(feature = "remote")]
pub use http::{HttpTemplates, HttpTemplatesConfig};
pub use memory::{MemoryStore, StaticTemplates};
