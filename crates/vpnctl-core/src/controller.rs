// ── Controller abstraction ──
//
// Owns the registry store, the connection state machine, both
// notification hubs, and the managers. Routes commands and boundary
// calls to them.

use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::command::{Command, CommandResult, channel};
use crate::config::CoreConfig;
use crate::connection::ConnectionMachine;
use crate::error::CoreError;
use crate::manager::{RoutingProfileManager, ServerManager, StorageManager};
use crate::model::{ConnectionState, VpnRequest};
use crate::store::RegistryStore;
use crate::stream::{EventSubscription, QueryLogHub, StateHub, Subscription};

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Every clone shares one
/// registry; dropping the last clone cancels any pending connect.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: CoreConfig,
    store: Arc<RegistryStore>,
    connection: ConnectionMachine,
    servers: ServerManager,
    profiles: RoutingProfileManager,
    storage: StorageManager,
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        self.connection.shutdown();
    }
}

impl Controller {
    /// Create a controller on the current tokio runtime.
    ///
    /// Fails with [`CoreError::NoRuntime`] outside a runtime context,
    /// since the connect timer needs somewhere to run.
    pub fn new(config: CoreConfig) -> Result<Self, CoreError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, runtime))
    }

    /// Create a controller whose timer tasks run on `runtime`.
    pub fn with_runtime(config: CoreConfig, runtime: Handle) -> Self {
        let store = Arc::new(if config.seed_mock_data {
            RegistryStore::seeded()
        } else {
            RegistryStore::new()
        });
        let state_hub = Arc::new(StateHub::new());
        let query_log = Arc::new(QueryLogHub::new(config.query_log_buffer));

        info!(
            seeded = config.seed_mock_data,
            servers = store.server_count(),
            profiles = store.profile_count(),
            "controller created"
        );

        Self {
            inner: Arc::new(ControllerInner {
                connection: ConnectionMachine::new(
                    Arc::clone(&store),
                    state_hub,
                    runtime,
                    config.connect_delay,
                ),
                servers: ServerManager::new(Arc::clone(&store)),
                profiles: RoutingProfileManager::new(Arc::clone(&store)),
                storage: StorageManager::new(Arc::clone(&store), query_log),
                store,
                config,
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<RegistryStore> {
        &self.inner.store
    }

    pub fn connection(&self) -> &ConnectionMachine {
        &self.inner.connection
    }

    pub fn servers(&self) -> &ServerManager {
        &self.inner.servers
    }

    pub fn profiles(&self) -> &RoutingProfileManager {
        &self.inner.profiles
    }

    pub fn storage(&self) -> &StorageManager {
        &self.inner.storage
    }

    // ── Connection shortcuts ─────────────────────────────────────

    pub fn start(&self) {
        self.inner.connection.start();
    }

    pub fn stop(&self) {
        self.inner.connection.stop();
    }

    pub fn current_state(&self) -> ConnectionState {
        self.inner.connection.current_state()
    }

    // ── Subscriptions ────────────────────────────────────────────

    /// Attach the connection-state observer. Replaces any previous one.
    pub fn subscribe_state(&self) -> Subscription<ConnectionState> {
        self.inner.connection.subscribe()
    }

    pub fn unsubscribe_state(&self) -> bool {
        self.inner.connection.unsubscribe()
    }

    /// Attach the query-log observer. Replaces any previous one.
    pub fn subscribe_query_log(&self) -> Subscription<VpnRequest> {
        self.inner.storage.subscribe_query_log()
    }

    pub fn unsubscribe_query_log(&self) -> bool {
        self.inner.storage.unsubscribe_query_log()
    }

    /// Record a routed request and publish it on the query-log channel.
    pub fn append_request(&self, request: VpnRequest) {
        self.inner.storage.append_request(request);
    }

    /// Attach the observer for a named event channel.
    pub fn listen(&self, event_channel: &str) -> Result<EventSubscription, CoreError> {
        match event_channel {
            channel::STATE_EVENTS => Ok(EventSubscription::State(self.subscribe_state())),
            channel::QUERY_LOG_EVENTS => {
                Ok(EventSubscription::QueryLog(self.subscribe_query_log()))
            }
            other => Err(CoreError::UnknownEventChannel {
                channel: other.to_owned(),
            }),
        }
    }

    /// Detach the observer of a named event channel. Returns `true` if
    /// one was attached.
    pub fn cancel(&self, event_channel: &str) -> Result<bool, CoreError> {
        match event_channel {
            channel::STATE_EVENTS => Ok(self.unsubscribe_state()),
            channel::QUERY_LOG_EVENTS => Ok(self.unsubscribe_query_log()),
            other => Err(CoreError::UnknownEventChannel {
                channel: other.to_owned(),
            }),
        }
    }

    // ── Command execution ────────────────────────────────────────

    /// Decode and run a boundary call, returning its encoded result.
    pub fn call(&self, channel: &str, method: &str, args: Value) -> Result<Value, CoreError> {
        let command = Command::decode(channel, method, args)?;
        debug!(channel, method, ?command, "dispatching call");
        self.execute(command)?.into_value()
    }

    /// Run a command against the owning manager.
    ///
    /// Only the bulk replacements can fail, when a list repeats an id.
    pub fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let inner = &self.inner;
        let result = match command {
            // ── Connection ───────────────────────────────────────
            Command::Start => {
                inner.connection.start();
                CommandResult::Ok
            }
            Command::Stop => {
                inner.connection.stop();
                CommandResult::Ok
            }
            Command::GetCurrentState => CommandResult::State(inner.connection.current_state()),

            // ── Storage ──────────────────────────────────────────
            Command::GetAllServers => CommandResult::Servers(inner.storage.get_all_servers()),
            Command::GetRoutingProfiles => {
                CommandResult::Profiles(inner.storage.get_routing_profiles())
            }
            Command::GetSelectedServerId => {
                CommandResult::SelectedServer(inner.storage.get_selected_server_id())
            }
            Command::SetSelectedServerId { id } => {
                inner.storage.set_selected_server_id(id);
                CommandResult::Ok
            }
            Command::GetExcludedRoutes => {
                CommandResult::ExcludedRoutes(inner.storage.get_excluded_routes())
            }
            Command::SetExcludedRoutes { routes } => {
                inner.storage.set_excluded_routes(routes);
                CommandResult::Ok
            }
            Command::GetAllRequests => CommandResult::Requests(inner.storage.get_all_requests()),
            Command::SetServers { servers } => {
                inner.storage.set_servers(servers)?;
                CommandResult::Ok
            }
            Command::SetRoutingProfiles { profiles } => {
                inner.storage.set_routing_profiles(profiles)?;
                CommandResult::Ok
            }

            // ── Servers ──────────────────────────────────────────
            Command::AddNewServer(request) => {
                CommandResult::ServerResult(inner.servers.add_new_server(request))
            }
            Command::SetNewServer { id, request } => {
                CommandResult::ServerResult(inner.servers.set_new_server(id, request))
            }
            Command::RemoveServer { id } => {
                inner.servers.remove_server(id);
                CommandResult::Ok
            }

            // ── Routing profiles ─────────────────────────────────
            Command::AddNewProfile => CommandResult::ProfileAdded(inner.profiles.add_new_profile()),
            Command::GetAllProfiles => CommandResult::Profiles(inner.profiles.get_all_profiles()),
            Command::SetDefaultRoutingMode { id, mode } => {
                inner.profiles.set_default_routing_mode(id, mode);
                CommandResult::Ok
            }
            Command::SetProfileName { id, name } => {
                inner.profiles.set_profile_name(id, name);
                CommandResult::Ok
            }
            Command::SetRules { id, mode, rules } => {
                inner.profiles.set_rules(id, mode, &rules);
                CommandResult::Ok
            }
            Command::RemoveAllRules { id } => {
                inner.profiles.remove_all_rules(id);
                CommandResult::Ok
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::ConnectionState::{Connected, Connecting, Disconnected};

    fn controller() -> Controller {
        Controller::new(CoreConfig::empty()).unwrap()
    }

    #[test]
    fn new_requires_a_runtime() {
        let err = Controller::new(CoreConfig::default()).err().unwrap();
        assert!(matches!(err, CoreError::NoRuntime(_)));
        assert_eq!(err.code(), "internal");
    }

    #[tokio::test]
    async fn seeding_follows_config() {
        let seeded = Controller::new(CoreConfig::default()).unwrap();
        assert_eq!(seeded.storage().get_all_servers().len(), 2);

        let empty = controller();
        assert!(empty.storage().get_all_servers().is_empty());
        assert_eq!(empty.storage().get_selected_server_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_through_calls() {
        let ctrl = controller();
        let mut events = ctrl.listen(channel::STATE_EVENTS).unwrap();

        assert_eq!(ctrl.call(channel::CONNECTION, "start", Value::Null).unwrap(), Value::Null);
        assert_eq!(
            ctrl.call(channel::CONNECTION, "getCurrentState", Value::Null).unwrap(),
            json!(1)
        );
        ctrl.call(channel::CONNECTION, "stop", Value::Null).unwrap();
        tokio::time::sleep(ctrl.config().connect_delay * 2).await;

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(events.next_value().await.unwrap());
        }
        assert_eq!(seen, vec![json!(0), json!(1), json!(0)]);
        assert_eq!(ctrl.current_state(), Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_the_timer() {
        let ctrl = controller();
        let store = Arc::clone(ctrl.store());
        let mut sub = ctrl.subscribe_state();
        ctrl.start();

        drop(ctrl);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(store.connection_state(), Connecting);
        assert_eq!(sub.drain(), vec![Disconnected, Connecting]);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_state_machine() {
        let ctrl = controller();
        let other = ctrl.clone();
        other.start();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(ctrl.current_state(), Connected);
    }

    #[tokio::test]
    async fn add_new_profile_answers_null_at_the_boundary() {
        let ctrl = controller();
        let value = ctrl
            .call(channel::ROUTING_PROFILES, "addNewProfile", Value::Null)
            .unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(
            ctrl.execute(Command::AddNewProfile).unwrap(),
            CommandResult::ProfileAdded(2)
        );
    }

    #[tokio::test]
    async fn unknown_event_channel_is_rejected() {
        let ctrl = controller();
        let err = ctrl.listen("vpn_plugin_event_channel_metrics").err().unwrap();
        assert!(matches!(err, CoreError::UnknownEventChannel { .. }));
        assert!(ctrl.cancel("nope").is_err());
        assert!(!ctrl.cancel(channel::QUERY_LOG_EVENTS).unwrap());
    }
}
