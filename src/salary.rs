use chrono::Days;
use rusqlite::Connection;

use crate::dates::{parse_date, today};
use crate::db::create_job;
use crate::error::{FoyerError, Result};
use crate::models::{JobKind, Movement, SalarySlip};
use crate::movements;

pub const CAT_SALARY: &str = "Salary";
pub const CAT_INCOME_TAX: &str = "Income Tax";
pub const CAT_HOUSING: &str = "Housing Allowance";
pub const CAT_EXPENSE_REPORTS: &str = "Expense Reports";

/// The five most recent payslip months.
pub fn recent_months(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT month FROM salary_items WHERE numeric_value IS NOT NULL \
         ORDER BY month DESC LIMIT 5",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Pivoted payslip for one month from the net_salaries view.
pub fn slip(conn: &Connection, month: &str) -> Result<SalarySlip> {
    conn.query_row(
        "SELECT month, net_salary, net_bonus, salary_tax, bonus_tax, housing, other, total \
         FROM net_salaries WHERE month = ?1",
        [month],
        |row| {
            Ok(SalarySlip {
                month: row.get(0)?,
                net_salary: row.get(1)?,
                net_bonus: row.get(2)?,
                salary_tax: row.get(3)?,
                bonus_tax: row.get(4)?,
                housing: row.get(5)?,
                other: row.get(6)?,
                total: row.get(7)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FoyerError::NoSalaryData(month.to_string()),
        other => other.into(),
    })
}

/// The bank deposit carrying the slip total, matched on income or, when the
/// deposit was already neutralized, on initial_income.
pub fn find_deposit(conn: &Connection, amount: f64, month: &str) -> Result<Option<Movement>> {
    let sql = format!(
        "SELECT {} FROM movements \
         WHERE (ABS(COALESCE(income, 0) - ?1) < 0.005 OR ABS(COALESCE(initial_income, 0) - ?1) < 0.005) \
         AND month = ?2",
        crate::models::MOVEMENT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(rusqlite::params![amount, month], Movement::from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub struct SalaryImport {
    pub job_id: i64,
    pub entries: usize,
    pub deposit_id: Option<i64>,
    pub simulated: bool,
}

/// Decompose a month's salary into ledger entries: net salary, income tax,
/// housing allowance, expense reports, plus a savings-flagged bonus pair when
/// the slip carries one. The matching bank deposit is neutralized into its
/// initial_income. With `simulate` the transaction is rolled back.
pub fn import(
    conn: &mut Connection,
    month: &str,
    account: &str,
    declared_by: &str,
    simulate: bool,
) -> Result<SalaryImport> {
    let slip = slip(conn, month)?;
    let deposit = find_deposit(conn, slip.total, month)?;
    let number = movements::max_number(conn)? + 1;

    let date = match &deposit {
        Some(d) => d.date.clone().unwrap_or_else(today),
        // no deposit yet: assume payday two days before the month starts
        None => parse_date(month)?
            .checked_sub_days(Days::new(2))
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(today),
    };

    let tx = conn.transaction()?;
    let job_id = create_job(&tx, JobKind::Salary, Some(month))?;

    let mut entries: Vec<(String, f64, f64, &str, bool)> = vec![
        // (description, income, expense, category, is_savings)
        (
            format!("Net salary for {month}"),
            slip.net_salary,
            0.0,
            CAT_SALARY,
            false,
        ),
        (
            format!("Income tax on {month} salary"),
            0.0,
            -slip.salary_tax,
            CAT_INCOME_TAX,
            false,
        ),
        (
            format!("Housing allowance for {month}"),
            slip.housing,
            0.0,
            CAT_HOUSING,
            false,
        ),
    ];
    if slip.other > 0.0 {
        entries.push((
            format!("Expense reports for {month}"),
            slip.other,
            0.0,
            CAT_EXPENSE_REPORTS,
            false,
        ));
    }
    if slip.net_bonus > 0.0 {
        entries.push((
            format!("Net bonus for {month}"),
            slip.net_bonus,
            0.0,
            CAT_SALARY,
            true,
        ));
        entries.push((
            format!("Tax on {month} bonus"),
            0.0,
            -slip.bonus_tax,
            CAT_SALARY,
            true,
        ));
    }

    for (description, income, expense, category, is_savings) in &entries {
        movements::insert(
            &tx,
            &Movement {
                date: Some(date.clone()),
                description: description.clone(),
                income: Some(*income),
                expense: Some(*expense),
                account: Some(account.to_string()),
                category: Some(category.to_string()),
                is_savings: *is_savings,
                month: month.to_string(),
                inserted_on: today(),
                number,
                parent_id: deposit.as_ref().map(|d| d.id),
                job_id,
                declared_by: Some(declared_by.to_string()),
                ..Movement::default()
            },
        )?;
    }

    if let Some(deposit) = &deposit {
        tx.execute(
            "UPDATE movements SET initial_income = income, income = 0 WHERE id = ?1",
            [deposit.id],
        )?;
    }

    if simulate {
        tx.rollback()?;
    } else {
        tx.commit()?;
    }

    Ok(SalaryImport {
        job_id,
        entries: entries.len(),
        deposit_id: deposit.map(|d| d.id),
        simulated: simulate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute("INSERT INTO accounts (name, kind) VALUES ('Main Checking', 'current')", [])
            .unwrap();
        (dir, conn)
    }

    fn add_item(conn: &Connection, item: &str, month: &str, value: f64) {
        conn.execute(
            "INSERT INTO salary_items (item, month, numeric_value) VALUES (?1, ?2, ?3)",
            rusqlite::params![item, month, value],
        )
        .unwrap();
    }

    /// net 2800, tax -230, housing 150 => total 2720
    fn seed_payslip(conn: &Connection, month: &str) {
        add_item(conn, "net_salary", month, 2800.0);
        add_item(conn, "salary_tax", month, -230.0);
        add_item(conn, "housing", month, 150.0);
    }

    #[test]
    fn test_slip_pivots_items() {
        let (_dir, conn) = test_db();
        seed_payslip(&conn, "2025-05-01");
        let s = slip(&conn, "2025-05-01").unwrap();
        assert_eq!(s.net_salary, 2800.0);
        assert_eq!(s.salary_tax, -230.0);
        assert_eq!(s.housing, 150.0);
        assert_eq!(s.total, 2720.0);
        assert_eq!(s.net_bonus, 0.0);
    }

    #[test]
    fn test_slip_missing_month() {
        let (_dir, conn) = test_db();
        assert!(matches!(
            slip(&conn, "2025-05-01"),
            Err(FoyerError::NoSalaryData(_))
        ));
    }

    #[test]
    fn test_recent_months_newest_first() {
        let (_dir, conn) = test_db();
        for month in ["2025-03-01", "2025-04-01", "2025-05-01"] {
            seed_payslip(&conn, month);
        }
        let months = recent_months(&conn).unwrap();
        assert_eq!(months[0], "2025-05-01");
        assert_eq!(months.len(), 3);
    }

    #[test]
    fn test_import_decomposes_and_neutralizes_deposit() {
        let (_dir, mut conn) = test_db();
        seed_payslip(&conn, "2025-05-01");
        let deposit_id = movements::create(
            &conn, "2025-04-29", "EMPLOYER TRANSFER", Some("Main Checking"), None, None, Some(2720.0), "2025-05-01",
        )
        .unwrap();

        let outcome = import(&mut conn, "2025-05-01", "Main Checking", "Camille", false).unwrap();
        assert_eq!(outcome.entries, 3);
        assert_eq!(outcome.deposit_id, Some(deposit_id));

        // entries net out to the slip total
        let net: f64 = conn
            .query_row(
                "SELECT SUM(COALESCE(income,0)) - SUM(COALESCE(expense,0)) FROM movements WHERE job_id = ?1",
                [outcome.job_id],
                |r| r.get(0),
            )
            .unwrap();
        assert!((net - 2720.0).abs() < 0.005, "net {net}");

        // deposit neutralized, entries dated from the deposit, parented to it
        let deposit = movements::get(&conn, deposit_id).unwrap();
        assert_eq!(deposit.income, Some(0.0));
        assert_eq!(deposit.initial_income, Some(2720.0));
        let dates: Vec<Option<String>> = conn
            .prepare("SELECT date FROM movements WHERE job_id = ?1")
            .unwrap()
            .query_map([outcome.job_id], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert!(dates.iter().all(|d| d.as_deref() == Some("2025-04-29")));
        let parents: Vec<Option<i64>> = conn
            .prepare("SELECT parent_id FROM movements WHERE job_id = ?1")
            .unwrap()
            .query_map([outcome.job_id], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert!(parents.iter().all(|p| *p == Some(deposit_id)));
    }

    #[test]
    fn test_import_with_bonus_adds_savings_pair() {
        let (_dir, mut conn) = test_db();
        seed_payslip(&conn, "2025-06-01");
        add_item(&conn, "net_bonus", "2025-06-01", 900.0);
        add_item(&conn, "bonus_tax", "2025-06-01", -120.0);

        let outcome = import(&mut conn, "2025-06-01", "Main Checking", "Camille", false).unwrap();
        assert_eq!(outcome.entries, 5);
        let savings: i64 = conn
            .query_row(
                "SELECT count(*) FROM movements WHERE job_id = ?1 AND is_savings = 1",
                [outcome.job_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(savings, 2);
    }

    #[test]
    fn test_import_without_deposit_backdates_two_days() {
        let (_dir, mut conn) = test_db();
        seed_payslip(&conn, "2025-05-01");
        let outcome = import(&mut conn, "2025-05-01", "Main Checking", "Camille", false).unwrap();
        assert!(outcome.deposit_id.is_none());
        let date: String = conn
            .query_row(
                "SELECT date FROM movements WHERE job_id = ?1 LIMIT 1",
                [outcome.job_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(date, "2025-04-29");
    }

    #[test]
    fn test_simulate_leaves_database_untouched() {
        let (_dir, mut conn) = test_db();
        seed_payslip(&conn, "2025-05-01");
        let before: i64 = conn
            .query_row("SELECT count(*) FROM movements", [], |r| r.get(0))
            .unwrap();
        let outcome = import(&mut conn, "2025-05-01", "Main Checking", "Camille", true).unwrap();
        assert!(outcome.simulated);
        let after: i64 = conn
            .query_row("SELECT count(*) FROM movements", [], |r| r.get(0))
            .unwrap();
        assert_eq!(before, after);
    }
}
