//! Owns the live ledger and keeps the store, engine, and config in step.

use std::path::{Path, PathBuf};

use expenseflow_config::{Config, ConfigManager};
use expenseflow_core::{
    ExportService, ExportSnapshot, KeyValueStore, LedgerService, LedgerStore, MemberRemoval,
    SettlementPolicy, SettlementReport, SettlementService,
};
use expenseflow_domain::{Expense, ExpenseId, Ledger};
use expenseflow_storage_json::{write_export, write_export_to_path, JsonFileStore};
use tracing::{info, warn};

use crate::{errors::Result, utils::paths};

/// A single user's working session.
///
/// Every mutation is validated, applied, and persisted as a whole; if the
/// store rejects the write the in-memory ledger is rolled back.
pub struct Session<S: KeyValueStore = JsonFileStore> {
    ledger: Ledger,
    store: LedgerStore<S>,
    engine: SettlementService,
    config: Config,
    config_manager: Option<ConfigManager>,
}

impl Session<JsonFileStore> {
    /// Opens the session rooted at `base`, loading config and ledger from disk.
    pub fn open(base: &Path) -> Result<Self> {
        let config_manager = ConfigManager::with_base_dir(base.to_path_buf())?;
        let config = config_manager.load()?;
        let store = JsonFileStore::new(paths::data_dir_in(base))?;
        let mut session = Self::with_store(store, config)?;
        session.config_manager = Some(config_manager);
        info!(
            base = %base.display(),
            members = session.ledger.member_count(),
            expenses = session.ledger.expense_count(),
            "session opened"
        );
        Ok(session)
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Builds a session over any store; config changes stay in memory.
    pub fn with_store(store: S, config: Config) -> Result<Self> {
        let store = LedgerStore::new(store);
        let ledger = store.load()?;
        let engine = SettlementService::new(SettlementPolicy::new(config.settlement_tolerance)?);
        Ok(Self {
            ledger,
            store,
            engine,
            config,
            config_manager: None,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &SettlementService {
        &self.engine
    }

    pub fn add_member(&mut self, name: &str) -> Result<String> {
        self.mutate(|ledger| LedgerService::add_member(ledger, name))
    }

    pub fn remove_member(&mut self, name: &str) -> Result<MemberRemoval> {
        self.mutate(|ledger| LedgerService::remove_member(ledger, name))
    }

    pub fn add_expense(
        &mut self,
        description: &str,
        amount: f64,
        paid_by: &str,
        split_between: &[String],
    ) -> Result<ExpenseId> {
        self.mutate(|ledger| {
            LedgerService::add_expense(ledger, description, amount, paid_by, split_between)
        })
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense> {
        self.mutate(|ledger| LedgerService::remove_expense(ledger, id))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.mutate(|ledger| {
            LedgerService::clear(ledger);
            Ok(())
        })
    }

    /// Balances and settlements for the current ledger.
    pub fn report(&self) -> Result<SettlementReport> {
        Ok(self.engine.settle(&self.ledger)?)
    }

    pub fn export_snapshot(&self) -> Result<ExportSnapshot> {
        Ok(ExportService::snapshot(&self.ledger, &self.engine)?)
    }

    /// Writes an export to `target`, or to the configured export directory.
    pub fn export(&self, target: Option<&Path>) -> Result<PathBuf> {
        let snapshot = self.export_snapshot()?;
        let path = match target {
            Some(path) => {
                write_export_to_path(&snapshot, path)?;
                path.to_path_buf()
            }
            None => write_export(&snapshot, &self.config.resolve_export_dir())?,
        };
        info!(path = %path.display(), "ledger exported");
        Ok(path)
    }

    /// Updates one setting, applies it to the engine, and persists it when
    /// the session is backed by a config file.
    pub fn update_config(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.config.clone();
        updated.set(key, value)?;
        let engine =
            SettlementService::new(SettlementPolicy::new(updated.settlement_tolerance)?);
        if let Some(manager) = &self.config_manager {
            manager.save(&updated)?;
        }
        self.config = updated;
        self.engine = engine;
        Ok(())
    }

    fn mutate<T>(
        &mut self,
        apply: impl FnOnce(&mut Ledger) -> std::result::Result<T, expenseflow_core::CoreError>,
    ) -> Result<T> {
        let previous = self.ledger.clone();
        let outcome = apply(&mut self.ledger)?;
        if let Err(err) = self.store.save(&self.ledger) {
            warn!(error = %err, "persisting ledger failed, rolling back");
            self.ledger = previous;
            return Err(err.into());
        }
        Ok(outcome)
    }
}
