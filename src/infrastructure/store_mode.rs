use crate::domain::ports::StoreModeProvider;
use std::sync::{Arc, RwLock};

/// Environment variable consulted by [`EnvStoreModeProvider`].
pub const DATA_STORE_TYPE_VAR: &str = "DATA_STORE_TYPE";

/// A store mode fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct FixedStoreMode(Option<String>);

impl FixedStoreMode {
    pub fn new(mode: impl Into<String>) -> Self {
        Self(Some(mode.into()))
    }

    /// Always routes to the primary store. Used when no provider is supplied.
    pub fn primary() -> Self {
        Self(None)
    }
}

impl StoreModeProvider for FixedStoreMode {
    fn store_mode(&self) -> Option<String> {
        self.0.clone()
    }
}

/// A store mode that can be switched at runtime.
///
/// Clones share the same setting, so one handle can be given to the payment
/// service while another is kept to flip between primary and backup.
#[derive(Debug, Clone, Default)]
pub struct SharedStoreMode {
    mode: Arc<RwLock<Option<String>>>,
}

impl SharedStoreMode {
    pub fn new(mode: Option<String>) -> Self {
        Self {
            mode: Arc::new(RwLock::new(mode)),
        }
    }

    pub fn set(&self, mode: Option<String>) {
        // A poisoned lock still holds a valid Option<String>.
        let mut guard = self.mode.write().unwrap_or_else(|e| e.into_inner());
        *guard = mode;
    }
}

impl StoreModeProvider for SharedStoreMode {
    fn store_mode(&self) -> Option<String> {
        self.mode
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Reads the store mode from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvStoreModeProvider {
    var: String,
}

impl EnvStoreModeProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvStoreModeProvider {
    fn default() -> Self {
        Self::new(DATA_STORE_TYPE_VAR)
    }
}

impl StoreModeProvider for EnvStoreModeProvider {
    fn store_mode(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}
