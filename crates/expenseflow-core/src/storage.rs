use std::{collections::HashMap, sync::Mutex};

use serde::de::DeserializeOwned;
use tracing::warn;

use expenseflow_domain::{Expense, Ledger};

use crate::{CoreError, LedgerService};

/// Key under which the ordered member names are stored.
pub const MEMBERS_KEY: &str = "expenseflow_members";
/// Key under which the ordered expense records are stored.
pub const EXPENSES_KEY: &str = "expenseflow_expenses";

/// Abstraction over simple string key-value backends.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// In-memory [`KeyValueStore`], handy for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, CoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

/// Persists a [`Ledger`] as two JSON values in a [`KeyValueStore`].
pub struct LedgerStore<S> {
    store: S,
}

impl<S: KeyValueStore> LedgerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes the full member list and expense list.
    ///
    /// Both values are serialized before anything is written. If the expense
    /// write fails, the previous member list is put back so the two keys keep
    /// describing the same ledger.
    pub fn save(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let members = serde_json::to_string(ledger.members())?;
        let expenses = serde_json::to_string(ledger.expenses())?;
        let previous_members = self.store.get(MEMBERS_KEY)?;

        self.store.set(MEMBERS_KEY, &members)?;
        if let Err(err) = self.store.set(EXPENSES_KEY, &expenses) {
            self.put_back(MEMBERS_KEY, previous_members.as_deref());
            return Err(err);
        }
        Ok(())
    }

    fn put_back(&self, key: &str, previous: Option<&str>) {
        let outcome = match previous {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        if let Err(err) = outcome {
            warn!(key, error = %err, "could not restore stored value after a failed save");
        }
    }

    /// Reads the ledger back. Missing keys load as empty lists; unreadable
    /// JSON in either key discards both and yields an empty ledger.
    pub fn load(&self) -> Result<Ledger, CoreError> {
        let members_raw = self.store.get(MEMBERS_KEY)?;
        let expenses_raw = self.store.get(EXPENSES_KEY)?;

        let parsed = parse_list::<String>(members_raw.as_deref()).and_then(|members| {
            parse_list::<Expense>(expenses_raw.as_deref()).map(|expenses| (members, expenses))
        });

        match parsed {
            Ok((members, expenses)) => Ok(LedgerService::restore(members, expenses)),
            Err(err) => {
                warn!(error = %err, "stored ledger is unreadable, starting empty");
                Ok(Ledger::new())
            }
        }
    }
}

fn parse_list<T: DeserializeOwned>(raw: Option<&str>) -> Result<Vec<T>, CoreError> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim() == "null" => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}
