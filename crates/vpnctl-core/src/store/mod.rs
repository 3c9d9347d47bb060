// ── Registry store ──
//
// Single-lock ownership of every piece of mutable domain state, with
// cheap `Arc` snapshots of the server and profile lists.

mod registry;
mod registry_store;
mod seed;

pub use registry::Registry;
pub(crate) use registry::{PendingConnect, first_duplicate_id};
pub use registry_store::RegistryStore;
