//! Derived snapshots for JSON export.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use expenseflow_domain::{Balances, Expense, Ledger, Settlement};

use crate::{CoreError, SettlementService};

/// Everything a user gets when exporting a ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub members: Vec<String>,
    pub expenses: Vec<Expense>,
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
    pub total: f64,
    pub exported_at: DateTime<Utc>,
}

pub struct ExportService;

impl ExportService {
    pub fn snapshot(
        ledger: &Ledger,
        engine: &SettlementService,
    ) -> Result<ExportSnapshot, CoreError> {
        Self::snapshot_at(ledger, engine, Utc::now())
    }

    pub fn snapshot_at(
        ledger: &Ledger,
        engine: &SettlementService,
        exported_at: DateTime<Utc>,
    ) -> Result<ExportSnapshot, CoreError> {
        let report = engine.settle(ledger)?;
        Ok(ExportSnapshot {
            members: ledger.members().to_vec(),
            expenses: ledger.expenses().to_vec(),
            balances: report.balances,
            settlements: report.settlements,
            total: report.total,
            exported_at,
        })
    }

    /// Default export file name, e.g. `expenseflow-2024-05-31.json`.
    pub fn file_name(date: NaiveDate) -> String {
        format!("expenseflow-{}.json", date.format("%Y-%m-%d"))
    }

    pub fn to_json(snapshot: &ExportSnapshot) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerService;
    use chrono::TimeZone;

    #[test]
    fn snapshot_carries_derived_values() {
        let mut ledger = Ledger::new();
        for name in ["A", "B", "C"] {
            LedgerService::add_member(&mut ledger, name).unwrap();
        }
        let split: Vec<String> = ledger.members().to_vec();
        LedgerService::add_expense(&mut ledger, "Groceries", 90.0, "A", &split).unwrap();

        let exported_at = Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap();
        let snapshot =
            ExportService::snapshot_at(&ledger, &SettlementService::default(), exported_at)
                .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&ExportService::to_json(&snapshot).unwrap()).unwrap();

        assert_eq!(json["members"].as_array().unwrap().len(), 3);
        assert_eq!(json["balances"]["A"], 60.0);
        assert_eq!(json["settlements"][0]["from"], "B");
        assert_eq!(json["settlements"][0]["to"], "A");
        assert_eq!(json["total"], 90.0);
        assert_eq!(json["exportedAt"], "2024-05-31T12:00:00Z");
        assert_eq!(json["expenses"][0]["paidBy"], "A");
    }

    #[test]
    fn file_name_uses_export_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(ExportService::file_name(date), "expenseflow-2024-01-09.json");
    }
}
