use super::account::Account;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port for debtor accounts.
///
/// Both the primary and the backup store implement this trait. No
/// transactional guarantee is assumed beyond "the last write issued wins".
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store(&self, account: Account) -> Result<()>;
    async fn get(&self, account_id: &str) -> Result<Option<Account>>;
    async fn get_all(&self) -> Result<Vec<Account>>;
}

/// Source of the runtime store-mode setting.
///
/// Queried once per payment. `Some("Backup")` routes the payment to the backup
/// store; any other value, or `None`, routes it to the primary store.
pub trait StoreModeProvider: Send + Sync {
    fn store_mode(&self) -> Option<String>;
}

/// Which account store a payment is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Primary,
    Backup,
}

impl StoreMode {
    pub const BACKUP_SETTING: &'static str = "Backup";

    /// Maps a raw setting to a mode. Only the exact, case-sensitive value
    /// `"Backup"` selects the backup store.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some(Self::BACKUP_SETTING) => Self::Backup,
            _ => Self::Primary,
        }
    }
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type StoreModeProviderBox = Box<dyn StoreModeProvider>;
