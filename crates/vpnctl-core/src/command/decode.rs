// ── Method-call decoding ──
//
// Maps `(channel, method, args)` triples onto `Command`s. Absent args
// are read as an empty object, so a method that needs a field reports
// it as missing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::Command;
use super::requests::{
    ExcludedRoutesArgs, IdArgs, ModeArgs, NameArgs, ProfilesArgs, RulesArgs, ServerRequest,
    ServersArgs,
};
use crate::error::CoreError;
use crate::store::first_duplicate_id;

/// Channel names understood at the boundary.
pub mod channel {
    pub const CONNECTION: &str = "ivpn_manager";
    pub const STORAGE: &str = "storage_manager";
    pub const SERVERS: &str = "servers_manager";
    pub const ROUTING_PROFILES: &str = "routing_profiles_manager";

    /// Connection state events, as integer ordinals.
    pub const STATE_EVENTS: &str = "vpn_plugin_event_channel";
    /// Request log events, as request objects.
    pub const QUERY_LOG_EVENTS: &str = "vpn_plugin_event_channel_query_log";
}

impl Command {
    /// Decode a boundary call.
    ///
    /// Missing or mistyped arguments yield [`CoreError::InvalidArgument`];
    /// an unknown channel or method yields [`CoreError::NotImplemented`].
    pub fn decode(channel: &str, method: &str, args: Value) -> Result<Self, CoreError> {
        let args = if args.is_null() {
            Value::Object(Map::new())
        } else {
            args
        };
        let call = Call {
            channel,
            method,
            args: &args,
        };

        match channel {
            self::channel::CONNECTION => call.connection(),
            self::channel::STORAGE => call.storage(),
            self::channel::SERVERS => call.servers(),
            self::channel::ROUTING_PROFILES => call.routing_profiles(),
            _ => Err(call.not_implemented()),
        }
    }
}

struct Call<'a> {
    channel: &'a str,
    method: &'a str,
    args: &'a Value,
}

impl Call<'_> {
    fn connection(&self) -> Result<Command, CoreError> {
        match self.method {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "getCurrentState" => Ok(Command::GetCurrentState),
            _ => Err(self.not_implemented()),
        }
    }

    fn storage(&self) -> Result<Command, CoreError> {
        match self.method {
            "getAllServers" => Ok(Command::GetAllServers),
            "getRoutingProfiles" => Ok(Command::GetRoutingProfiles),
            "getSelectedServerId" => Ok(Command::GetSelectedServerId),
            "setSelectedServerId" => {
                let IdArgs { id } = self.parse()?;
                Ok(Command::SetSelectedServerId { id })
            }
            "getExcludedRoutes" => Ok(Command::GetExcludedRoutes),
            "setExcludedRoutes" => {
                let ExcludedRoutesArgs { routes } = self.parse()?;
                Ok(Command::SetExcludedRoutes {
                    routes: routes.unwrap_or_default(),
                })
            }
            "getAllRequests" => Ok(Command::GetAllRequests),
            "setServers" => {
                let ServersArgs { servers } = self.parse()?;
                self.unique_ids("server", servers.iter().map(|s| s.id))?;
                Ok(Command::SetServers { servers })
            }
            "setRoutingProfiles" => {
                let ProfilesArgs { profiles } = self.parse()?;
                self.unique_ids("profile", profiles.iter().map(|p| p.id))?;
                Ok(Command::SetRoutingProfiles { profiles })
            }
            _ => Err(self.not_implemented()),
        }
    }

    fn servers(&self) -> Result<Command, CoreError> {
        match self.method {
            "addNewServer" => Ok(Command::AddNewServer(self.parse::<ServerRequest>()?)),
            "getAllServers" => Ok(Command::GetAllServers),
            "setNewServer" => {
                let IdArgs { id } = self.parse()?;
                let request = self.parse::<ServerRequest>()?;
                Ok(Command::SetNewServer { id, request })
            }
            "setSelectedServerId" => {
                let IdArgs { id } = self.parse()?;
                Ok(Command::SetSelectedServerId { id })
            }
            "removeServer" => {
                let IdArgs { id } = self.parse()?;
                Ok(Command::RemoveServer { id })
            }
            _ => Err(self.not_implemented()),
        }
    }

    fn routing_profiles(&self) -> Result<Command, CoreError> {
        match self.method {
            "addNewProfile" => Ok(Command::AddNewProfile),
            "getAllProfiles" => Ok(Command::GetAllProfiles),
            "setDefaultRoutingMode" => {
                let ModeArgs { id, mode } = self.parse()?;
                Ok(Command::SetDefaultRoutingMode { id, mode })
            }
            "setProfileName" => {
                let NameArgs { id, name } = self.parse()?;
                Ok(Command::SetProfileName { id, name })
            }
            "setRules" => {
                let RulesArgs { id, mode, rules } = self.parse()?;
                Ok(Command::SetRules { id, mode, rules })
            }
            "removeAllRules" => {
                let IdArgs { id } = self.parse()?;
                Ok(Command::RemoveAllRules { id })
            }
            _ => Err(self.not_implemented()),
        }
    }

    fn parse<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        T::deserialize(self.args)
            .map_err(|e| CoreError::invalid_argument(self.channel, self.method, e.to_string()))
    }

    fn unique_ids(&self, kind: &str, ids: impl Iterator<Item = i64>) -> Result<(), CoreError> {
        match first_duplicate_id(ids) {
            Some(id) => Err(CoreError::invalid_argument(
                self.channel,
                self.method,
                format!("duplicate {kind} id {id}"),
            )),
            None => Ok(()),
        }
    }

    fn not_implemented(&self) -> CoreError {
        CoreError::NotImplemented {
            channel: self.channel.to_owned(),
            method: self.method.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{RoutingMode, VpnProtocol};

    #[test]
    fn unit_methods_ignore_args() {
        assert_eq!(
            Command::decode(channel::CONNECTION, "start", Value::Null).unwrap(),
            Command::Start
        );
        assert_eq!(
            Command::decode(channel::STORAGE, "getAllRequests", json!({"x": 1})).unwrap(),
            Command::GetAllRequests
        );
    }

    #[test]
    fn missing_id_is_invalid_argument() {
        let err = Command::decode(channel::SERVERS, "removeServer", Value::Null).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert_eq!(err.code(), "bad-args");

        let err =
            Command::decode(channel::STORAGE, "setSelectedServerId", json!({"id": "1"})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn unknown_method_or_channel_is_not_implemented() {
        let err = Command::decode(channel::CONNECTION, "reboot", Value::Null).unwrap_err();
        assert!(matches!(err, CoreError::NotImplemented { .. }));

        let err = Command::decode("nope", "start", Value::Null).unwrap_err();
        assert_eq!(err.code(), "not-implemented");
    }

    #[test]
    fn excluded_routes_default_to_empty() {
        for args in [json!({}), json!({"routes": null})] {
            assert_eq!(
                Command::decode(channel::STORAGE, "setExcludedRoutes", args).unwrap(),
                Command::SetExcludedRoutes {
                    routes: String::new()
                }
            );
        }
    }

    #[test]
    fn set_new_server_reads_id_and_fields_from_one_object() {
        let cmd = Command::decode(
            channel::SERVERS,
            "setNewServer",
            json!({
                "id": 3,
                "ipAddress": "10.0.0.3",
                "domain": "vpn3.example.com",
                "username": "u",
                "password": "p",
                "protocol": 1,
                "routingProfileId": 2,
                "dnsServers": "1.1.1.1",
            }),
        )
        .unwrap();

        let Command::SetNewServer { id, request } = cmd else {
            panic!("unexpected command {cmd:?}");
        };
        assert_eq!(id, 3);
        assert_eq!(request.login, "u");
        assert_eq!(request.protocol, VpnProtocol::Http2);
    }

    #[test]
    fn bulk_lists_with_repeated_ids_are_invalid_argument() {
        let err = Command::decode(
            channel::STORAGE,
            "setRoutingProfiles",
            json!({"profiles": [
                {"id": 2, "name": "A", "defaultMode": 0, "bypassRules": [], "vpnRules": []},
                {"id": 2, "name": "B", "defaultMode": 1, "bypassRules": [], "vpnRules": []},
            ]}),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(err.to_string().contains("duplicate profile id 2"));
    }

    #[test]
    fn server_without_protocol_is_invalid_argument() {
        let err = Command::decode(
            channel::SERVERS,
            "addNewServer",
            json!({"ipAddress": "10.0.0.1", "routingProfileId": 1}),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn unknown_mode_ordinal_is_invalid_argument() {
        let err = Command::decode(
            channel::ROUTING_PROFILES,
            "setRules",
            json!({"id": 1, "mode": 7, "rules": ""}),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));

        let ok = Command::decode(
            channel::ROUTING_PROFILES,
            "setRules",
            json!({"id": 1, "mode": 1, "rules": "a"}),
        )
        .unwrap();
        assert_eq!(ok, Command::SetRules {
            id: 1,
            mode: RoutingMode::Bypass,
            rules: "a".into()
        });
    }
}
