// ── Routing profile CRUD ──

use std::sync::Arc;

use tracing::{debug, info};

use crate::model::{ProfileId, RoutingMode, RoutingProfile};
use crate::rules::parse_rules;
use crate::store::RegistryStore;

/// Creates routing profiles and edits them in place. Operations on an
/// unknown id change nothing.
pub struct RoutingProfileManager {
    store: Arc<RegistryStore>,
}

impl RoutingProfileManager {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Append a fresh profile and return its id.
    pub fn add_new_profile(&self) -> ProfileId {
        let id = self.store.mutate(|reg| {
            let id = reg.next_profile_id();
            reg.profiles.push(RoutingProfile::new(id));
            id
        });
        info!(id, "routing profile added");
        id
    }

    pub fn set_default_routing_mode(&self, id: ProfileId, mode: RoutingMode) {
        self.edit(id, "default mode", |profile| profile.default_mode = mode);
    }

    pub fn set_profile_name(&self, id: ProfileId, name: String) {
        self.edit(id, "name", |profile| profile.name = name);
    }

    /// Replace the rule list for `mode` with one rule per non-blank
    /// line of `rules`.
    pub fn set_rules(&self, id: ProfileId, mode: RoutingMode, rules: &str) {
        let rules = parse_rules(rules);
        self.edit(id, "rules", |profile| *profile.rules_mut(mode) = rules);
    }

    pub fn remove_all_rules(&self, id: ProfileId) {
        self.edit(id, "rules cleared", RoutingProfile::clear_rules);
    }

    pub fn get_all_profiles(&self) -> Arc<Vec<RoutingProfile>> {
        self.store.snapshot_profiles()
    }

    fn edit(&self, id: ProfileId, what: &'static str, f: impl FnOnce(&mut RoutingProfile)) {
        let found = self.store.mutate(|reg| reg.profile_mut(id).map(f).is_some());
        if found {
            debug!(id, what, "routing profile updated");
        } else {
            debug!(id, what, "routing profile update ignored, no such profile");
        }
    }
}
