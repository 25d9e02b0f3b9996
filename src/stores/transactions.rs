//! Concurrent storage for transaction records.
//!
//! Records live in a sharded hash map keyed by transaction ID, so point
//! operations on different keys do not contend with each other. Listing
//! materializes a snapshot first and windows over it, see
//! [`super::pagination`].

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ids::IdGenerator;
use super::pagination::paginate;
use crate::dto::is_blank_id;
use crate::{NewTransaction, Transaction};

#[derive(Debug)]
struct StoredTransaction {
    /// Insertion sequence number, gives listings a stable order
    seq: u64,
    transaction: Transaction,
}

#[derive(Default)]
pub struct TransactionsStore {
    records: DashMap<String, StoredTransaction>,
    next_seq: AtomicU64,
    ids: IdGenerator,
}

impl TransactionsStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_seq: AtomicU64::new(0),
            ids: IdGenerator::new(),
        }
    }

    /// Stores a new transaction and returns the stored record.
    /// A missing or blank ID is generated. An existing record under the same ID is
    /// overwritten but keeps its position in listings.
    pub fn create(&self, new: NewTransaction) -> Transaction {
        let transaction = self.build(new);
        match self.records.entry(transaction.id.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().transaction = transaction.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredTransaction {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    transaction: transaction.clone(),
                });
            }
        }
        transaction
    }

    /// Stores a new transaction only if its ID is free.
    /// Returns `None` and leaves the store untouched if the ID is taken.
    pub fn insert_if_absent(&self, new: NewTransaction) -> Option<Transaction> {
        let transaction = self.build(new);
        match self.records.entry(transaction.id.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(StoredTransaction {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    transaction: transaction.clone(),
                });
                Some(transaction)
            }
        }
    }

    fn build(&self, mut new: NewTransaction) -> Transaction {
        let id = match new.id.take().filter(|id| !is_blank_id(id)) {
            Some(id) => {
                self.ids.reserve(&id);
                id
            }
            None => self.ids.generate(|id| self.records.contains_key(id)),
        };
        Transaction::new(id, new)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Transaction> {
        self.records.get(id).map(|entry| entry.transaction.clone())
    }

    /// Gets page `page` of all transactions in insertion order.
    pub fn find_all(&self, page: usize, size: usize) -> Vec<Transaction> {
        if size == 0 {
            return Vec::new();
        }
        paginate(self.snapshot(), page, size)
    }

    /// Gets page `page` of the transactions of one account in insertion
    /// order.
    pub fn find_by_account_id(
        &self,
        account_id: &str,
        page: usize,
        size: usize,
    ) -> Vec<Transaction> {
        if size == 0 {
            return Vec::new();
        }
        paginate(
            self.snapshot_where(|tx| tx.account_id == account_id),
            page,
            size,
        )
    }

    /// Replaces the stored record with the same ID.
    /// Returns false, and stores nothing, if there is no such record.
    pub fn update(&self, transaction: Transaction) -> bool {
        match self.records.get_mut(&transaction.id) {
            Some(mut entry) => {
                entry.transaction = transaction;
                true
            }
            None => false,
        }
    }

    /// Runs `f` on a copy of the stored record while holding the record's
    /// lock, and commits the copy if `f` succeeds.
    /// Returns `None` if there is no record with the ID. On error the stored
    /// record is unchanged.
    pub fn update_with<F, E>(&self, id: &str, f: F) -> Option<Result<Transaction, E>>
    where
        F: FnOnce(&mut Transaction) -> Result<(), E>,
    {
        let mut entry = self.records.get_mut(id)?;
        let mut updated = entry.transaction.clone();
        Some(f(&mut updated).map(|()| {
            // The key and the record's ID must agree
            updated.id.clone_from(&entry.transaction.id);
            entry.transaction = updated.clone();
            updated
        }))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.records.remove(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// All records in insertion order, copied out of the map.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.snapshot_where(|_| true)
    }

    fn snapshot_where(&self, filter: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        let mut entries: Vec<(u64, Transaction)> = self
            .records
            .iter()
            .filter(|entry| filter(&entry.transaction))
            .map(|entry| (entry.seq, entry.transaction.clone()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, tx)| tx).collect()
    }
}
