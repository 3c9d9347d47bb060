//! Control-plane core for a VPN client.
//!
//! This crate owns the connection lifecycle, the server and routing
//! profile registry, and change notification:
//!
//! - **[`Controller`]**: central facade. Cheaply cloneable; owns the
//!   registry, the state machine, both notification hubs, and the
//!   managers. [`Controller::execute`] runs a typed [`Command`];
//!   [`Controller::call`] decodes a `(channel, method, args)` boundary
//!   call and encodes the result as JSON.
//!
//! - **[`RegistryStore`]**: one `parking_lot::Mutex` around every piece
//!   of mutable state, with server and profile lists republished to
//!   `watch` channels after each mutation.
//!
//! - **[`ConnectionMachine`]**: DISCONNECTED / CONNECTING / CONNECTED,
//!   with a cancellable, generation-checked auto-connect timer.
//!
//! - **[`StateHub`] / [`QueryLogHub`]**: zero-or-one observer channels
//!   for state transitions and request log entries.
//!
//! - **Managers** ([`ServerManager`], [`RoutingProfileManager`],
//!   [`StorageManager`]): validated operation groups over the registry.

pub mod command;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod manager;
pub mod model;
pub mod rules;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{
    AddServerResult, Command, CommandResult, InvalidField, ServerRequest, channel,
};
pub use config::CoreConfig;
pub use connection::ConnectionMachine;
pub use controller::Controller;
pub use error::CoreError;
pub use manager::{RoutingProfileManager, ServerManager, StorageManager};
pub use store::{Registry, RegistryStore};
pub use stream::{EventSubscription, QueryLogHub, StateHub, Subscription};

pub use model::{
    ConnectionState, ProfileId, RoutingMode, RoutingProfile, Server, ServerId, VpnProtocol,
    VpnRequest,
};
