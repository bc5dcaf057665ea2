use crate::domain::payment::{PaymentDecision, PaymentRequest};
use crate::domain::ports::{AccountStore, AccountStoreBox, StoreMode, StoreModeProviderBox};
use crate::domain::validator::validate;
use crate::error::Result;
use crate::infrastructure::store_mode::FixedStoreMode;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Authorizes payments and debits the debtor account when they are approved.
///
/// `PaymentService` owns a primary and a backup account store and asks its
/// store-mode provider which one to use on every payment. A payment is
/// fetched, validated and persisted through that single store.
///
/// Payments against the same debtor account are serialized with a
/// per-account lock held from fetch to persist, so concurrent callers can't
/// both validate against a stale balance.
pub struct PaymentService {
    primary: AccountStoreBox,
    backup: AccountStoreBox,
    store_mode: StoreModeProviderBox,
    account_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `primary` - The store used unless the provider says `"Backup"`.
    /// * `backup` - The store used when the provider says `"Backup"`.
    /// * `store_mode` - Queried once per payment.
    pub fn new(
        primary: AccountStoreBox,
        backup: AccountStoreBox,
        store_mode: StoreModeProviderBox,
    ) -> Self {
        Self {
            primary,
            backup,
            store_mode,
            account_locks: DashMap::new(),
        }
    }

    /// Creates a `PaymentService` that always routes to the primary store.
    pub fn with_default_mode(primary: AccountStoreBox, backup: AccountStoreBox) -> Self {
        Self::new(primary, backup, Box::new(FixedStoreMode::primary()))
    }

    /// Validates `request` against the debtor account and, if approved,
    /// debits the account by exactly `request.amount` and persists it.
    ///
    /// Rejections are returned as `Ok` decisions. Store failures and balance
    /// overflow are propagated as errors; in that case nothing is persisted
    /// and no decision is returned.
    pub async fn make_payment(&self, request: &PaymentRequest) -> Result<PaymentDecision> {
        let debtor = request.debtor_account_id.as_str();
        let lock = self.account_lock(debtor);
        let outcome = {
            let _guard = lock.lock().await;
            self.authorize_and_debit(request).await
        };
        drop(lock);
        self.release_account_lock(debtor);
        outcome
    }

    async fn authorize_and_debit(&self, request: &PaymentRequest) -> Result<PaymentDecision> {
        let (mode, store) = self.resolve_store();
        debug!(?mode, debtor = %request.debtor_account_id, "Resolved account store");

        let account = store.get(&request.debtor_account_id).await?;
        let decision = validate(request, account.as_ref());

        if decision.approved
            && let Some(mut account) = account
        {
            account.debit(request.amount)?;
            let balance = account.balance.value();
            store.store(account).await?;
            info!(
                debtor = %request.debtor_account_id,
                creditor = %request.creditor_account_id,
                scheme = %request.scheme,
                amount = %request.amount,
                %balance,
                "Payment approved"
            );
        } else {
            info!(
                debtor = %request.debtor_account_id,
                scheme = %request.scheme,
                amount = %request.amount,
                reason = ?decision.rejection,
                "Payment rejected"
            );
        }

        Ok(decision)
    }

    /// Reads the current store mode and returns the matching store.
    fn resolve_store(&self) -> (StoreMode, &dyn AccountStore) {
        let setting = self.store_mode.store_mode();
        let mode = StoreMode::from_setting(setting.as_deref());
        let store = match mode {
            StoreMode::Primary => self.primary.as_ref(),
            StoreMode::Backup => self.backup.as_ref(),
        };
        (mode, store)
    }

    fn account_lock(&self, account_id: &str) -> Arc<Mutex<()>> {
        self.account_locks
            .entry(account_id.to_owned())
            .or_default()
            .clone()
    }

    /// Drops the lock entry once no other call holds or awaits it.
    fn release_account_lock(&self, account_id: &str) {
        self.account_locks
            .remove_if(account_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Account, AllowedPaymentSchemes, Balance};
    use crate::domain::payment::{PaymentScheme, RejectionReason};
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use crate::infrastructure::store_mode::SharedStoreMode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn bacs_account(id: &str) -> Account {
        Account {
            allowed_schemes: AllowedPaymentSchemes::BACS,
            ..Account::new(id)
        }
    }

    #[tokio::test]
    async fn test_approved_payment_debits_primary() {
        let primary = InMemoryAccountStore::with_accounts([bacs_account("D123")]);
        let backup = InMemoryAccountStore::new();
        let service =
            PaymentService::with_default_mode(Box::new(primary.clone()), Box::new(backup.clone()));

        let request = PaymentRequest::new("D123", "C1", dec!(-5), PaymentScheme::Bacs);
        let decision = service.make_payment(&request).await.unwrap();

        assert!(decision.approved);
        let account = primary.get("D123").await.unwrap().unwrap();
        assert_eq!(account.balance, Balance::new(dec!(5)));
        assert!(backup.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_payment_leaves_balance_untouched() {
        let account = Account {
            allowed_schemes: AllowedPaymentSchemes::FASTER_PAYMENTS,
            balance: Balance::new(dec!(9)),
            ..Account::new("D123")
        };
        let primary = InMemoryAccountStore::with_accounts([account.clone()]);
        let service = PaymentService::with_default_mode(
            Box::new(primary.clone()),
            Box::new(InMemoryAccountStore::new()),
        );

        let request = PaymentRequest::new("D123", "C1", dec!(10), PaymentScheme::FasterPayments);
        let first = service.make_payment(&request).await.unwrap();
        let second = service.make_payment(&request).await.unwrap();

        assert_eq!(first, PaymentDecision::reject(RejectionReason::InsufficientFunds));
        assert_eq!(first, second);
        assert_eq!(primary.get("D123").await.unwrap().unwrap(), account);
    }

    #[tokio::test]
    async fn test_missing_account_is_rejected_without_persisting() {
        let primary = InMemoryAccountStore::new();
        let service = PaymentService::with_default_mode(
            Box::new(primary.clone()),
            Box::new(InMemoryAccountStore::new()),
        );

        let request = PaymentRequest::new("NOPE", "C1", dec!(1), PaymentScheme::Chaps);
        let decision = service.make_payment(&request).await.unwrap();

        assert_eq!(decision.rejection, Some(RejectionReason::AccountNotFound));
        assert!(primary.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mode_change_applies_to_next_payment() {
        let primary = InMemoryAccountStore::with_accounts([bacs_account("D123")]);
        let backup = InMemoryAccountStore::with_accounts([bacs_account("D123")]);
        let mode = SharedStoreMode::default();
        let service = PaymentService::new(
            Box::new(primary.clone()),
            Box::new(backup.clone()),
            Box::new(mode.clone()),
        );

        let request = PaymentRequest::new("D123", "C1", dec!(1), PaymentScheme::Bacs);
        service.make_payment(&request).await.unwrap();

        mode.set(Some("Backup".to_string()));
        service.make_payment(&request).await.unwrap();
        service.make_payment(&request).await.unwrap();

        let primary_balance = primary.get("D123").await.unwrap().unwrap().balance;
        let backup_balance = backup.get("D123").await.unwrap().unwrap().balance;
        assert_eq!(primary_balance, Balance::new(dec!(-1)));
        assert_eq!(backup_balance, Balance::new(dec!(-2)));
    }

    #[tokio::test]
    async fn test_concurrent_payments_never_overdraw_instant_account() {
        let account = Account {
            allowed_schemes: AllowedPaymentSchemes::FASTER_PAYMENTS,
            balance: Balance::new(dec!(10)),
            ..Account::new("D123")
        };
        let primary = InMemoryAccountStore::with_accounts([account]);
        let service = Arc::new(PaymentService::with_default_mode(
            Box::new(primary.clone()),
            Box::new(InMemoryAccountStore::new()),
        ));

        let mut handles = Vec::new();
        for _ in 0..25 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let request =
                    PaymentRequest::new("D123", "C1", dec!(1), PaymentScheme::FasterPayments);
                service.make_payment(&request).await.unwrap()
            }));
        }

        let mut approved = 0;
        for handle in handles {
            if handle.await.unwrap().approved {
                approved += 1;
            }
        }

        assert_eq!(approved, 10);
        let account = primary.get("D123").await.unwrap().unwrap();
        assert_eq!(account.balance, Balance::ZERO);
        assert!(service.account_locks.is_empty());
    }

    #[tokio::test]
    async fn test_balance_overflow_is_an_error_and_not_persisted() {
        let account = Account {
            balance: Balance::new(Decimal::MAX),
            ..bacs_account("D123")
        };
        let primary = InMemoryAccountStore::with_accounts([account.clone()]);
        let service = PaymentService::with_default_mode(
            Box::new(primary.clone()),
            Box::new(InMemoryAccountStore::new()),
        );

        let request = PaymentRequest::new("D123", "C1", dec!(-1), PaymentScheme::Bacs);
        let result = service.make_payment(&request).await;

        assert!(matches!(result, Err(PaymentError::BalanceOverflow(_))));
        assert_eq!(primary.get("D123").await.unwrap().unwrap(), account);

        let request = PaymentRequest::new("D123", "C1", dec!(1), PaymentScheme::Bacs);
        assert!(service.make_payment(&request).await.unwrap().approved);
    }

    #[tokio::test]
    async fn test_account_locks_released_after_each_call() {
        let primary = InMemoryAccountStore::with_accounts([bacs_account("D123")]);
        let service = PaymentService::with_default_mode(
            Box::new(primary),
            Box::new(InMemoryAccountStore::new()),
        );

        for i in 0..1_000 {
            let request =
                PaymentRequest::new(format!("UNKNOWN{i}"), "C1", dec!(1), PaymentScheme::Bacs);
            service.make_payment(&request).await.unwrap();
        }
        let request = PaymentRequest::new("D123", "C1", dec!(1), PaymentScheme::Bacs);
        service.make_payment(&request).await.unwrap();

        assert!(service.account_locks.is_empty());
    }
}
