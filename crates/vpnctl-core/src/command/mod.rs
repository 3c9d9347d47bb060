// ── Command API ──
//
// Every operation the control plane offers is a `Command` variant.
// The controller routes each variant to the owning manager; transport
// adapters reach it through `Command::decode` and
// `CommandResult::into_value`.

mod decode;
pub mod requests;

use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{
    ConnectionState, ProfileId, RoutingMode, RoutingProfile, Server, ServerId, VpnRequest,
};

pub use decode::channel;
pub use requests::{AddServerResult, InvalidField, ServerRequest};

/// All operations against the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ── Connection ───────────────────────────────────────────────────
    Start,
    Stop,
    GetCurrentState,

    // ── Storage ──────────────────────────────────────────────────────
    GetAllServers,
    GetRoutingProfiles,
    GetSelectedServerId,
    SetSelectedServerId {
        id: ServerId,
    },
    GetExcludedRoutes,
    SetExcludedRoutes {
        routes: String,
    },
    GetAllRequests,
    SetServers {
        servers: Vec<Server>,
    },
    SetRoutingProfiles {
        profiles: Vec<RoutingProfile>,
    },

    // ── Servers ──────────────────────────────────────────────────────
    AddNewServer(ServerRequest),
    SetNewServer {
        id: ServerId,
        request: ServerRequest,
    },
    RemoveServer {
        id: ServerId,
    },

    // ── Routing profiles ─────────────────────────────────────────────
    AddNewProfile,
    GetAllProfiles,
    SetDefaultRoutingMode {
        id: ProfileId,
        mode: RoutingMode,
    },
    SetProfileName {
        id: ProfileId,
        name: String,
    },
    SetRules {
        id: ProfileId,
        mode: RoutingMode,
        rules: String,
    },
    RemoveAllRules {
        id: ProfileId,
    },
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    State(ConnectionState),
    ServerResult(AddServerResult),
    ProfileAdded(ProfileId),
    SelectedServer(Option<ServerId>),
    ExcludedRoutes(String),
    Servers(Arc<Vec<Server>>),
    Profiles(Arc<Vec<RoutingProfile>>),
    Requests(Vec<VpnRequest>),
}

impl CommandResult {
    /// Encode for the method-call boundary. Unit results and the id of
    /// a newly added profile both encode as `null`.
    pub fn into_value(self) -> Result<Value, CoreError> {
        let value = match self {
            Self::Ok | Self::ProfileAdded(_) => Value::Null,
            Self::State(state) => Value::from(i64::from(state)),
            Self::ServerResult(result) => Value::from(i64::from(result)),
            Self::SelectedServer(id) => id.map_or(Value::Null, Value::from),
            Self::ExcludedRoutes(routes) => Value::String(routes),
            Self::Servers(servers) => encode(servers.as_slice())?,
            Self::Profiles(profiles) => encode(profiles.as_slice())?,
            Self::Requests(requests) => encode(&requests)?,
        };
        Ok(value)
    }
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(format!("encode failed: {e}")))
}
