use std::collections::HashMap;

/// Session-storage key holding the last chosen period token ("" for a custom range).
pub const PERIOD_KEY: &str = "period";
/// Session-storage key holding a custom range's start date ("" when a period is active).
pub const START_DATE_KEY: &str = "startDate";
/// Session-storage key holding a custom range's end date ("" when a period is active).
pub const END_DATE_KEY: &str = "endDate";

/// String key-value store scoped to one browser/app session.
///
/// Used to restore the last chart period or custom date range after a reload.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-process session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Read a key, treating an empty string the same as a missing one.
pub(crate) fn get_non_empty(store: &dyn SessionStore, key: &str) -> Option<String> {
    store.get(key).filter(|v| !v.trim().is_empty())
}
