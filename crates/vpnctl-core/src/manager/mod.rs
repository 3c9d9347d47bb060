// ── Registry managers ──
//
// Validated operation groups over the shared `RegistryStore`. Each
// operation is one read-modify-write under the registry lock.

mod profiles;
mod servers;
mod storage;

pub use profiles::RoutingProfileManager;
pub use servers::ServerManager;
pub use storage::StorageManager;
