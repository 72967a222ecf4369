use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::traits::Activity;
use crate::types::ActivityMetadata;

/// Activities available to a host, keyed by their published action identifier.
#[derive(Default)]
pub struct ActivityRegistry {
    activities: HashMap<String, Arc<dyn Activity>>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self {
            activities: HashMap::new(),
        }
    }

    /// Register an activity. An existing entry with the same action is replaced.
    pub fn register(&mut self, activity: Arc<dyn Activity>) {
        let action = activity.action().to_string();
        if self.activities.contains_key(&action) {
            warn!(action = %action, "Replacing previously registered activity");
        } else {
            debug!(action = %action, suite = %activity.suite(), "Registered activity");
        }
        self.activities.insert(action, activity);
    }

    pub fn get(&self, action: &str) -> Option<Arc<dyn Activity>> {
        self.activities.get(action).cloned()
    }

    /// Sorted action identifiers.
    pub fn list(&self) -> Vec<String> {
        let mut actions: Vec<String> = self.activities.keys().cloned().collect();
        actions.sort();
        actions
    }

    /// Metadata of every activity in `suite`, sorted by display name.
    pub fn suite(&self, suite: &str) -> Vec<ActivityMetadata> {
        let mut found: Vec<ActivityMetadata> = self
            .activities
            .values()
            .filter(|a| a.suite() == suite)
            .map(|a| a.metadata().clone())
            .collect();
        found.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        found
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
