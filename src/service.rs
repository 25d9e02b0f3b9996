//! Business rules on top of the record store.
//!
//! The service owns a shared [`TransactionsStore`] and an optional
//! [`ReadCache`] in front of point lookups. Every mutation that goes through
//! the service invalidates the cache entry of the record before returning.

use std::sync::Arc;

use crate::stores::{CacheStats, ReadCache, TransactionsStore};
use crate::dto::is_blank_id;
use crate::{Error, NewTransaction, Transaction, TransactionPatch};

pub struct TransactionService {
    store: Arc<TransactionsStore>,
    cache: Option<ReadCache>,
}

impl TransactionService {
    pub fn new(store: Arc<TransactionsStore>, cache: Option<ReadCache>) -> Self {
        Self { store, cache }
    }

    /// A service over a fresh store with the read cache enabled.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(TransactionsStore::new()), Some(ReadCache::new()))
    }

    /// Creates a transaction. A caller-supplied ID must not be in use; a
    /// blank one is replaced by a generated ID.
    pub fn create(&self, new: NewTransaction) -> Result<Transaction, Error> {
        let created = match new.id.clone().filter(|id| !is_blank_id(id)) {
            Some(id) => self.store.insert_if_absent(new).ok_or_else(|| {
                tracing::warn!(%id, "rejected create, ID already exists");
                Error::AlreadyExists(id)
            })?,
            None => self.store.create(new),
        };
        tracing::info!(id = %created.id, account_id = %created.account_id, "created transaction");
        Ok(created)
    }

    pub fn get(&self, id: &str) -> Result<Transaction, Error> {
        let found = match &self.cache {
            Some(cache) => cache.get(id, |id| self.store.find_by_id(id)),
            None => self.store.find_by_id(id),
        };
        found.ok_or_else(|| {
            tracing::debug!(%id, "transaction not found");
            Error::NotFound(id.to_owned())
        })
    }

    pub fn list(&self, page: usize, size: usize) -> Vec<Transaction> {
        self.store.find_all(page, size)
    }

    pub fn list_by_account(&self, account_id: &str, page: usize, size: usize) -> Vec<Transaction> {
        self.store.find_by_account_id(account_id, page, size)
    }

    /// Merges the supplied fields of `patch` into the stored record and
    /// returns the result.
    ///
    /// # Errors
    /// * [`Error::NotFound`] if there is no record with the ID
    /// * [`Error::ImmutableFieldViolation`] if the patch carries a different
    ///   account ID; the stored record is left unchanged
    pub fn update(&self, id: &str, patch: TransactionPatch) -> Result<Transaction, Error> {
        let result = self.store.update_with(id, |existing| {
            if let Some(account_id) = &patch.account_id {
                if *account_id != existing.account_id {
                    return Err(Error::ImmutableFieldViolation { field: "accountId" });
                }
            }
            existing.apply(patch);
            Ok(())
        });

        match result {
            None => {
                tracing::warn!(%id, "rejected update of missing transaction");
                Err(Error::NotFound(id.to_owned()))
            }
            Some(Err(error)) => {
                tracing::warn!(%id, %error, "rejected update");
                Err(error)
            }
            Some(Ok(updated)) => {
                self.invalidate(id);
                tracing::info!(%id, "updated transaction");
                Ok(updated)
            }
        }
    }

    pub fn delete(&self, id: &str) -> Result<(), Error> {
        if !self.store.delete(id) {
            tracing::warn!(%id, "rejected delete of missing transaction");
            return Err(Error::NotFound(id.to_owned()));
        }
        self.invalidate(id);
        tracing::info!(%id, "deleted transaction");
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Every record in listing order.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.store.snapshot()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ReadCache::stats)
    }

    fn invalidate(&self, id: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionType;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn services() -> [TransactionService; 2] {
        [
            TransactionService::in_memory(),
            TransactionService::new(Arc::new(TransactionsStore::new()), None),
        ]
    }

    fn acc1_deposit() -> NewTransaction {
        NewTransaction::new("ACC1", dec!(100.50), TransactionType::Deposit)
    }

    #[test]
    fn test_crud_flow() {
        for service in services() {
            let created = service.create(acc1_deposit()).unwrap();
            assert!(!created.id.is_empty());

            assert_eq!(service.get(&created.id).unwrap(), created);

            let updated = service
                .update(
                    &created.id,
                    TransactionPatch {
                        amount: Some(dec!(50.00)),
                        ..Default::default()
                    },
                )
                .unwrap();
            assert_eq!(updated.amount, dec!(50.00));
            assert_eq!(updated.tx_type, TransactionType::Deposit);
            assert_eq!(updated.account_id, "ACC1");
            assert_eq!(service.get(&created.id).unwrap(), updated);

            service.delete(&created.id).unwrap();
            assert_eq!(
                service.get(&created.id),
                Err(Error::NotFound(created.id.clone()))
            );
        }
    }

    #[test]
    fn test_create_with_existing_id_fails() {
        let service = TransactionService::in_memory();
        service.create(acc1_deposit().with_id("tx-1")).unwrap();

        let result = service.create(
            NewTransaction::new("ACC2", dec!(1), TransactionType::Transfer).with_id("tx-1"),
        );

        assert_eq!(result, Err(Error::AlreadyExists("tx-1".to_string())));
        assert_eq!(service.get("tx-1").unwrap().account_id, "ACC1");
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn test_create_with_blank_id_generates_one() {
        for service in services() {
            let first = service.create(acc1_deposit().with_id("   ")).unwrap();
            let second = service.create(acc1_deposit().with_id("   ")).unwrap();

            assert!(!first.id.trim().is_empty());
            assert_ne!(first.id, second.id);
            assert_eq!(service.get(&first.id).unwrap(), first);
            assert_eq!(service.get("   "), Err(Error::NotFound("   ".to_string())));
            assert_eq!(service.count(), 2);
        }
    }

    #[test]
    fn test_create_with_deleted_id_succeeds() {
        let service = TransactionService::in_memory();
        service.create(acc1_deposit().with_id("tx-1")).unwrap();
        service.delete("tx-1").unwrap();

        assert!(service.create(acc1_deposit().with_id("tx-1")).is_ok());
    }

    #[test]
    fn test_update_preserves_immutable_fields() {
        let service = TransactionService::in_memory();
        let created = service.create(acc1_deposit().with_description("rent")).unwrap();

        let updated = service
            .update(
                &created.id,
                TransactionPatch {
                    account_id: Some("ACC1".to_string()),
                    tx_type: Some(TransactionType::Withdrawal),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.account_id, created.account_id);
        assert_eq!(updated.timestamp, created.timestamp);
        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.tx_type, TransactionType::Withdrawal);
    }

    #[test]
    fn test_update_changing_account_fails() {
        for service in services() {
            let created = service.create(acc1_deposit()).unwrap();
            // Warm the cache
            service.get(&created.id).unwrap();

            let result = service.update(
                &created.id,
                TransactionPatch {
                    account_id: Some("ACC2".to_string()),
                    amount: Some(dec!(1)),
                    ..Default::default()
                },
            );

            assert_eq!(
                result,
                Err(Error::ImmutableFieldViolation { field: "accountId" })
            );
            assert_eq!(service.get(&created.id).unwrap(), created);
        }
    }

    #[test]
    fn test_update_missing_fails() {
        let service = TransactionService::in_memory();
        assert_eq!(
            service.update("nope", TransactionPatch::default()),
            Err(Error::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_delete_missing_fails() {
        let service = TransactionService::in_memory();
        assert_eq!(service.delete("nope"), Err(Error::NotFound("nope".to_string())));
    }

    #[test]
    fn test_get_is_served_from_cache() {
        let service = TransactionService::in_memory();
        let created = service.create(acc1_deposit()).unwrap();

        service.get(&created.id).unwrap();
        service.get(&created.id).unwrap();

        let stats = service.cache_stats().unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_write_invalidates_cache() {
        let service = TransactionService::in_memory();
        let created = service.create(acc1_deposit()).unwrap();
        service.get(&created.id).unwrap();

        service
            .update(
                &created.id,
                TransactionPatch {
                    description: Some("changed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            service.get(&created.id).unwrap().description.as_deref(),
            Some("changed")
        );

        service.delete(&created.id).unwrap();
        assert!(service.get(&created.id).is_err());
        assert_eq!(service.cache_stats().unwrap().entries, 0);
    }

    #[test]
    fn test_list_and_count() {
        let service = TransactionService::in_memory();
        assert!(service.list(0, 10).is_empty());
        assert_eq!(service.count(), 0);

        for i in 0..12 {
            let account = if i < 4 { "ACC1" } else { "ACC2" };
            service
                .create(NewTransaction::new(account, dec!(1), TransactionType::Deposit))
                .unwrap();
        }

        assert_eq!(service.count(), 12);
        assert_eq!(service.list(1, 10).len(), 2);
        assert_eq!(service.list_by_account("ACC1", 0, 10).len(), 4);
        assert_eq!(service.list_by_account("ACC2", 0, 10).len(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_produce_distinct_ids() {
        let service = Arc::new(TransactionService::in_memory());

        let handles: Vec<_> = (0..1000)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create(acc1_deposit()).unwrap().id })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 1000);
        assert_eq!(service.count(), 1000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_with_same_id_admit_one() {
        let service = Arc::new(TransactionService::in_memory());

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create(acc1_deposit().with_id("shared")) })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[test]
    fn test_cache_never_stale_under_concurrent_updates() {
        let service = TransactionService::in_memory();
        let created = service.create(acc1_deposit()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        service.get(&created.id).unwrap();
                    }
                });
            }
            scope.spawn(|| {
                for i in 1..=500i64 {
                    service
                        .update(
                            &created.id,
                            TransactionPatch {
                                amount: Some(Decimal::from(i)),
                                ..Default::default()
                            },
                        )
                        .unwrap();
                }
            });
        });

        assert_eq!(service.get(&created.id).unwrap().amount, dec!(500));
    }
}
