use chrono::Datelike;
use rusqlite::Connection;

use crate::dates::{month_key, parse_date};
use crate::db::create_job;
use crate::error::{FoyerError, Result};
use crate::fmt::round2;
use crate::models::{JobKind, Movement};
use crate::movements;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Twelve periods over the calendar year of the movement's month.
    Yearly,
    /// N periods, all on the movement's own month.
    Custom(u32),
}

pub struct SplitOutcome {
    pub job_id: i64,
    pub children: usize,
}

/// Divide an amount evenly over `periods`, cent-rounded, with the rounding
/// remainder folded into the last period so the parts sum to the whole.
fn allocate(total: f64, periods: usize) -> Vec<f64> {
    let per = round2(total / periods as f64);
    let mut parts = vec![per; periods];
    parts[periods - 1] = round2(total - per * (periods - 1) as f64);
    parts
}

fn split_months(movement: &Movement, mode: SplitMode) -> Result<Vec<String>> {
    match mode {
        SplitMode::Yearly => {
            let month = parse_date(&movement.month)?;
            Ok((1..=12).map(|m| month_key(month.year(), m)).collect())
        }
        SplitMode::Custom(n) => {
            if n < 2 {
                return Err(FoyerError::Other(format!(
                    "a split needs at least 2 periods, got {n}"
                )));
            }
            Ok(vec![movement.month.clone(); n as usize])
        }
    }
}

/// Split a movement over periods. The original keeps its amounts in the
/// initial_* columns and is zeroed; children share its number, point back to
/// it through parent_id and belong to one fresh `split` job.
pub fn split_movement(conn: &mut Connection, id: i64, mode: SplitMode) -> Result<SplitOutcome> {
    let original = movements::get(conn, id)?;
    let months = split_months(&original, mode)?;
    let periods = months.len();

    let incomes: Option<Vec<f64>> = original.income.map(|total| allocate(total, periods));
    let expenses: Option<Vec<f64>> = original.expense.map(|total| allocate(total, periods));

    let tx = conn.transaction()?;
    let job_id = create_job(&tx, JobKind::Split, None)?;

    tx.execute(
        "UPDATE movements SET initial_income = income, initial_expense = expense, \
         income = CASE WHEN income IS NULL THEN NULL ELSE 0 END, \
         expense = CASE WHEN expense IS NULL THEN NULL ELSE 0 END \
         WHERE id = ?1",
        [id],
    )?;

    for (i, month) in months.iter().enumerate() {
        movements::insert(
            &tx,
            &Movement {
                date: original.date.clone(),
                description: original.description.clone(),
                income: incomes.as_ref().map(|v| v[i]),
                expense: expenses.as_ref().map(|v| v[i]),
                account: original.account.clone(),
                category: original.category.clone(),
                is_savings: original.is_savings,
                is_settled: original.is_settled,
                month: month.clone(),
                inserted_on: original.inserted_on.clone(),
                provision_to_pay: original.provision_to_pay,
                provision_to_recover: original.provision_to_recover,
                event_date: original.event_date.clone(),
                provider: original.provider.clone(),
                is_excluded: original.is_excluded,
                reimbursement_rate: original.reimbursement_rate,
                highlight: original.highlight.clone(),
                number: original.number,
                reference: original.reference.clone(),
                parent_id: Some(id),
                initial_expense: original.expense,
                initial_income: original.income,
                user_label: original.user_label.clone(),
                job_id,
                declared_by: original.declared_by.clone(),
                ..Movement::default()
            },
        )?;
    }

    tx.commit()?;
    Ok(SplitOutcome {
        job_id,
        children: periods,
    })
}

/// Split into explicitly given signed parts: a positive amount becomes income,
/// a negative one an expense. Months come with the values.
pub fn split_values(conn: &mut Connection, id: i64, parts: &[(f64, String)]) -> Result<SplitOutcome> {
    if parts.is_empty() {
        return Err(FoyerError::Other("no split parts given".to_string()));
    }
    let original = movements::get(conn, id)?;

    let tx = conn.transaction()?;
    let job_id = create_job(&tx, JobKind::Split, None)?;

    tx.execute(
        "UPDATE movements SET initial_income = income, initial_expense = expense, \
         income = CASE WHEN income IS NULL THEN NULL ELSE 0 END, \
         expense = CASE WHEN expense IS NULL THEN NULL ELSE 0 END \
         WHERE id = ?1",
        [id],
    )?;

    for (value, month) in parts {
        movements::insert(
            &tx,
            &Movement {
                date: original.date.clone(),
                description: original.description.clone(),
                income: Some(if *value > 0.0 { *value } else { 0.0 }),
                expense: Some(if *value < 0.0 { -*value } else { 0.0 }),
                account: original.account.clone(),
                category: original.category.clone(),
                is_savings: original.is_savings,
                is_settled: original.is_settled,
                month: month.clone(),
                inserted_on: original.inserted_on.clone(),
                provision_to_pay: original.provision_to_pay,
                provision_to_recover: original.provision_to_recover,
                event_date: original.event_date.clone(),
                provider: original.provider.clone(),
                is_excluded: original.is_excluded,
                reimbursement_rate: original.reimbursement_rate,
                highlight: original.highlight.clone(),
                number: original.number,
                reference: original.reference.clone(),
                parent_id: Some(id),
                user_label: original.user_label.clone(),
                job_id,
                declared_by: original.declared_by.clone(),
                ..Movement::default()
            },
        )?;
    }

    tx.commit()?;
    Ok(SplitOutcome {
        job_id,
        children: parts.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::movements::{create, get};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute("INSERT INTO accounts (name, kind) VALUES ('Main Checking', 'current')", [])
            .unwrap();
        (dir, conn)
    }

    fn children_of(conn: &Connection, parent: i64) -> Vec<Movement> {
        let sql = format!(
            "SELECT {} FROM movements WHERE parent_id = ?1 ORDER BY id",
            crate::models::MOVEMENT_COLUMNS
        );
        conn.prepare(&sql)
            .unwrap()
            .query_map([parent], Movement::from_row)
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_allocate_remainder_lands_in_last_period() {
        let parts = allocate(100.0, 3);
        assert_eq!(parts, vec![33.33, 33.33, 33.34]);
        let total: f64 = parts.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocate_even_amount() {
        assert_eq!(allocate(120.0, 12), vec![10.0; 12]);
    }

    #[test]
    fn test_yearly_split_covers_calendar_year() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Insurance", Some("Main Checking"), Some("Utilities"), Some(100.0), None, "2025-06-01").unwrap();
        let outcome = split_movement(&mut conn, id, SplitMode::Yearly).unwrap();
        assert_eq!(outcome.children, 12);

        let children = children_of(&conn, id);
        assert_eq!(children.len(), 12);
        assert_eq!(children[0].month, "2025-01-01");
        assert_eq!(children[11].month, "2025-12-01");

        let sum: f64 = children.iter().map(|c| c.expense.unwrap()).sum();
        assert!((sum - 100.0).abs() < 1e-9, "children sum {sum}");
        // 100 / 12 = 8.33 with 8.37 left for December
        assert_eq!(children[0].expense, Some(8.33));
        assert_eq!(children[11].expense, Some(8.37));
    }

    #[test]
    fn test_custom_split_remainder_in_last_of_n() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Course fees", None, Some("Leisure"), Some(100.0), None, "2025-06-01").unwrap();
        split_movement(&mut conn, id, SplitMode::Custom(3)).unwrap();

        let children = children_of(&conn, id);
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.month == "2025-06-01"));
        assert_eq!(children[0].expense, Some(33.33));
        assert_eq!(children[2].expense, Some(33.34));
    }

    #[test]
    fn test_split_zeroes_parent_and_keeps_initials() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Bonus", None, Some("Salary"), None, Some(250.0), "2025-06-01").unwrap();
        split_movement(&mut conn, id, SplitMode::Custom(2)).unwrap();

        let parent = get(&conn, id).unwrap();
        assert_eq!(parent.income, Some(0.0));
        assert_eq!(parent.initial_income, Some(250.0));
        // the expense side was NULL and stays NULL
        assert!(parent.expense.is_none());
        assert!(parent.initial_expense.is_none());
    }

    #[test]
    fn test_children_share_number_and_split_job() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Insurance", None, Some("Utilities"), Some(60.0), None, "2025-06-01").unwrap();
        let parent_number = get(&conn, id).unwrap().number;
        let outcome = split_movement(&mut conn, id, SplitMode::Custom(4)).unwrap();

        let children = children_of(&conn, id);
        assert!(children.iter().all(|c| c.number == parent_number));
        assert!(children.iter().all(|c| c.job_id == outcome.job_id));
        let kind: String = conn
            .query_row("SELECT kind FROM jobs WHERE id = ?1", [outcome.job_id], |r| r.get(0))
            .unwrap();
        assert_eq!(kind, "split");
    }

    #[test]
    fn test_custom_split_rejects_single_period() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Insurance", None, Some("Utilities"), Some(60.0), None, "2025-06-01").unwrap();
        assert!(split_movement(&mut conn, id, SplitMode::Custom(1)).is_err());
    }

    #[test]
    fn test_split_values_signs_pick_the_side() {
        let (_dir, mut conn) = test_db();
        let id = create(&conn, "2025-06-15", "Settlement", None, Some("Other"), Some(50.0), None, "2025-06-01").unwrap();
        split_values(
            &mut conn,
            id,
            &[(-30.0, "2025-06-01".to_string()), (20.0, "2025-07-01".to_string())],
        )
        .unwrap();

        let children = children_of(&conn, id);
        assert_eq!(children[0].expense, Some(30.0));
        assert_eq!(children[0].income, Some(0.0));
        assert_eq!(children[1].income, Some(20.0));
        assert_eq!(children[1].month, "2025-07-01");
        // explicit parts carry no initial amounts
        assert!(children.iter().all(|c| c.initial_income.is_none() && c.initial_expense.is_none()));
    }

    #[test]
    fn test_split_missing_movement() {
        let (_dir, mut conn) = test_db();
        assert!(matches!(
            split_movement(&mut conn, 42, SplitMode::Yearly),
            Err(FoyerError::MovementNotFound(42))
        ));
    }
}
