use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Monthly balances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MonthlyBalance {
    pub month: String,
    pub expense: f64,
    pub income: f64,
    pub net: f64,
}

/// Expense, income and net per month from a start month onwards.
pub fn monthly_balances(conn: &Connection, first_month: &str) -> Result<Vec<MonthlyBalance>> {
    let mut stmt = conn.prepare(
        "SELECT month, SUM(COALESCE(expense, 0)), SUM(COALESCE(income, 0)), \
         SUM(COALESCE(income, 0)) - SUM(COALESCE(expense, 0)) \
         FROM movements WHERE month >= ?1 AND is_excluded = 0 \
         GROUP BY month ORDER BY month",
    )?;
    let rows = stmt.query_map([first_month], |row| {
        Ok(MonthlyBalance {
            month: row.get(0)?,
            expense: row.get(1)?,
            income: row.get(2)?,
            net: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Account balances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AccountBalance {
    pub account: String,
    pub kind: String,
    pub last_date: Option<String>,
    pub balance: f64,
}

pub fn account_balances(conn: &Connection, kind: Option<&str>) -> Result<Vec<AccountBalance>> {
    let map = |row: &rusqlite::Row| -> rusqlite::Result<AccountBalance> {
        Ok(AccountBalance {
            account: row.get(0)?,
            kind: row.get(1)?,
            last_date: row.get(2)?,
            balance: row.get(3)?,
        })
    };
    let rows = match kind {
        Some(kind) => {
            let mut stmt = conn.prepare(
                "SELECT account, kind, last_date, balance FROM account_balances \
                 WHERE kind = ?1 ORDER BY account",
            )?;
            let rows = stmt.query_map([kind], map)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT account, kind, last_date, balance FROM account_balances ORDER BY account",
            )?;
            let rows = stmt.query_map([], map)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Provision summary for one month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProvisionRow {
    pub category_group: Option<String>,
    pub category: Option<String>,
    pub income: f64,
    pub income_provisioned: f64,
    pub income_left: f64,
    pub expense: f64,
    pub expense_provisioned: f64,
    pub expense_left: f64,
}

/// Per-category provision figures for one month, either the current or the
/// savings columns of the summary view.
pub fn month_provisions(conn: &Connection, month: &str, savings: bool) -> Result<Vec<ProvisionRow>> {
    let prefix = if savings { "saved" } else { "current" };
    let sql = format!(
        "SELECT category_group, category, \
         {prefix}_income, {prefix}_income_provisioned, {prefix}_income_left, \
         {prefix}_expense, {prefix}_expense_provisioned, {prefix}_expense_left \
         FROM provision_summary WHERE month = ?1 \
         ORDER BY category_group, category"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([month], |row| {
        Ok(ProvisionRow {
            category_group: row.get(0)?,
            category: row.get(1)?,
            income: row.get(2)?,
            income_provisioned: row.get(3)?,
            income_left: row.get(4)?,
            expense: row.get(5)?,
            expense_provisioned: row.get(6)?,
            expense_left: row.get(7)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Classified category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassTotals {
    pub class: String,
    pub expense: f64,
    pub provision_to_pay: f64,
    pub income: f64,
    pub provision_to_recover: f64,
}

/// First classifier whose pattern occurs in the description, else "Common".
pub fn classify(description: &str, classifiers: &[(String, String)]) -> String {
    for (pattern, class) in classifiers {
        if description.contains(pattern.as_str()) {
            return class.clone();
        }
    }
    "Common".to_string()
}

/// Movements of one category-month grouped by classifier class, comparing
/// actuals against provisions.
pub fn categorized_provisions(
    conn: &Connection,
    category: &str,
    month: &str,
) -> Result<Vec<ClassTotals>> {
    let mut cls_stmt = conn.prepare("SELECT pattern, class FROM classifiers ORDER BY class")?;
    let classifiers: Vec<(String, String)> = cls_stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT description, COALESCE(expense, 0), COALESCE(provision_to_pay, 0), \
         COALESCE(income, 0), COALESCE(provision_to_recover, 0) \
         FROM movements WHERE is_excluded = 0 AND category = ?1 AND month = ?2",
    )?;
    let rows: Vec<(String, f64, f64, f64, f64)> = stmt
        .query_map([category, month], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut grouped: BTreeMap<String, ClassTotals> = BTreeMap::new();
    for (description, expense, to_pay, income, to_recover) in rows {
        let class = classify(&description, &classifiers);
        let entry = grouped.entry(class.clone()).or_insert_with(|| ClassTotals {
            class,
            ..ClassTotals::default()
        });
        entry.expense += expense;
        entry.provision_to_pay += to_pay;
        entry.income += income;
        entry.provision_to_recover += to_recover;
    }

    Ok(grouped.into_values().collect())
}
