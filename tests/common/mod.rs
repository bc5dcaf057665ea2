#![allow(dead_code)]

use async_trait::async_trait;
use payment_gate::domain::account::Account;
use payment_gate::domain::ports::AccountStore;
use payment_gate::error::{PaymentError, Result};
use payment_gate::infrastructure::in_memory::InMemoryAccountStore;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// An in-memory store that records every call made through it.
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: InMemoryAccountStore,
    gets: Arc<Mutex<Vec<String>>>,
    stores: Arc<Mutex<Vec<Account>>>,
    get_alls: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            inner: InMemoryAccountStore::with_accounts(accounts),
            ..Self::default()
        }
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn stores(&self) -> Vec<Account> {
        self.stores.lock().unwrap().clone()
    }

    pub fn untouched(&self) -> bool {
        self.gets().is_empty() && self.stores().is_empty()
    }

    pub async fn account(&self, id: &str) -> Option<Account> {
        self.inner.get(id).await.unwrap()
    }
}

#[async_trait]
impl AccountStore for RecordingStore {
    async fn store(&self, account: Account) -> Result<()> {
        self.stores.lock().unwrap().push(account.clone());
        self.inner.store(account).await
    }

    async fn get(&self, account_id: &str) -> Result<Option<Account>> {
        self.gets.lock().unwrap().push(account_id.to_string());
        self.inner.get(account_id).await
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        self.get_alls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all().await
    }
}

/// A store whose reads or writes fail as if the backend were unreachable.
#[derive(Clone)]
pub struct UnreachableStore {
    inner: InMemoryAccountStore,
    fail_reads: bool,
}

impl UnreachableStore {
    pub fn failing_reads() -> Self {
        Self {
            inner: InMemoryAccountStore::new(),
            fail_reads: true,
        }
    }

    pub fn failing_writes(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            inner: InMemoryAccountStore::with_accounts(accounts),
            fail_reads: false,
        }
    }
}

fn offline() -> PaymentError {
    PaymentError::IoError(std::io::Error::other("store offline"))
}

#[async_trait]
impl AccountStore for UnreachableStore {
    async fn store(&self, _account: Account) -> Result<()> {
        Err(offline())
    }

    async fn get(&self, account_id: &str) -> Result<Option<Account>> {
        if self.fail_reads {
            return Err(offline());
        }
        self.inner.get(account_id).await
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        Err(offline())
    }
}

/// Writes `lines` to a temporary file, one per line.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}
