use rusqlite::Connection;

use crate::dates::{current_month, month_key, today};
use crate::db::create_job;
use crate::error::Result;
use crate::models::{JobKind, Movement};
use crate::movements;

pub const CLOSE_DESCRIPTION: &str = "Automatic provision close";

/// Lay down twelve monthly provision rows for a category. Provision rows have
/// no account, number 0 and live under a single `provision` job.
pub fn generate(
    conn: &mut Connection,
    category: &str,
    year: i32,
    description: &str,
    to_pay: Option<f64>,
    to_recover: Option<f64>,
) -> Result<i64> {
    let tx = conn.transaction()?;
    let job_id = create_job(&tx, JobKind::Provision, None)?;
    for m in 1..=12 {
        movements::insert(
            &tx,
            &Movement {
                date: Some(month_key(year, 1)),
                description: description.to_string(),
                category: Some(category.to_string()),
                month: month_key(year, m),
                inserted_on: today(),
                provision_to_pay: to_pay,
                provision_to_recover: to_recover,
                job_id,
                ..Movement::default()
            },
        )?;
    }
    tx.commit()?;
    Ok(job_id)
}

/// A category-month whose expense provision has not been used up.
#[derive(Debug, Clone)]
pub struct RemainingProvision {
    pub month: String,
    pub category: String,
    pub remaining: f64,
}

/// Past months still carrying a positive expense provision, unless the
/// leftover is exactly the savings income provision (those offset each other).
pub fn remaining(conn: &Connection) -> Result<Vec<RemainingProvision>> {
    let mut stmt = conn.prepare(
        "SELECT month, category, ROUND(current_expense_left, 2) \
         FROM provision_summary \
         WHERE ROUND(current_expense_left, 2) > 0 \
           AND month < ?1 \
           AND ROUND(current_expense_left, 2) <> ROUND(saved_income_left, 2) \
         ORDER BY month DESC",
    )?;
    let rows = stmt.query_map([current_month()], |row| {
        Ok(RemainingProvision {
            month: row.get(0)?,
            category: row.get(1)?,
            remaining: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Close a provision by inserting one offsetting row so the category-month
/// nets to zero in the summary.
pub fn close(conn: &Connection, month: &str, category: &str, remaining: f64) -> Result<i64> {
    let job_id = create_job(conn, JobKind::Shutdown, None)?;
    movements::insert(
        conn,
        &Movement {
            date: Some(today()),
            description: CLOSE_DESCRIPTION.to_string(),
            category: Some(category.to_string()),
            month: month.to_string(),
            inserted_on: today(),
            provision_to_pay: Some(-remaining),
            job_id,
            ..Movement::default()
        },
    )
}
