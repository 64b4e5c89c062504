use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::masterdata::{add_account, add_classifier, add_keyword};
use crate::movements::create;
use crate::settings::db_path;

fn add_salary_item(conn: &Connection, item: &str, month: &str, value: f64) -> Result<()> {
    conn.execute(
        "INSERT INTO salary_items (item, month, numeric_value) VALUES (?1, ?2, ?3)",
        rusqlite::params![item, month, value],
    )?;
    Ok(())
}

/// Load a small household dataset: two accounts, a month of movements, a
/// payslip with its matching bank deposit, keyword rules and classifiers.
pub fn run() -> Result<()> {
    let conn = get_connection(&db_path())?;

    let existing: i64 = conn.query_row("SELECT count(*) FROM movements", [], |r| r.get(0))?;
    if existing > 0 {
        println!("Database already holds {existing} movement(s), demo data not loaded");
        return Ok(());
    }

    add_account(&conn, "Main Checking", "current")?;
    add_account(&conn, "Rainy Day", "savings")?;

    add_keyword(&conn, "SUPERMARKET", "Groceries", "contains")?;
    add_keyword(&conn, "PHARMACY", "Health", "contains")?;
    add_keyword(&conn, "TRAIN", "Transport", "starts_with")?;

    add_classifier(&conn, "PHARMACY", "Medical")?;
    add_classifier(&conn, "DOCTOR", "Medical")?;

    // net 2800, tax -230, housing 150 => deposit of 2720
    for (item, value) in [
        ("net_salary", 2800.0),
        ("salary_tax", -230.0),
        ("housing", 150.0),
    ] {
        add_salary_item(&conn, item, "2025-06-01", value)?;
    }

    let rows: &[(&str, &str, Option<&str>, Option<f64>, Option<f64>, &str)] = &[
        // (date, description, category, expense, income, month)
        ("2025-05-30", "EMPLOYER TRANSFER", None, None, Some(2720.0), "2025-06-01"),
        ("2025-06-01", "RENT JUNE", Some("Rent"), Some(920.0), None, "2025-06-01"),
        ("2025-06-03", "SUPERMARKET CITY CENTER", None, Some(86.40), None, "2025-06-01"),
        ("2025-06-07", "PHARMACY STATION", None, Some(14.90), None, "2025-06-01"),
        ("2025-06-10", "TRAIN PARIS RETURN", None, Some(62.00), None, "2025-06-01"),
        ("2025-06-14", "SUPERMARKET CITY CENTER", None, Some(73.25), None, "2025-06-01"),
        ("2025-06-18", "DOCTOR APPOINTMENT", Some("Health"), Some(30.0), None, "2025-06-01"),
        ("2025-06-21", "CINEMA TICKETS", Some("Leisure"), Some(24.0), None, "2025-06-01"),
        ("2025-06-25", "ELECTRICITY BILL", Some("Utilities"), Some(78.50), None, "2025-06-01"),
    ];
    for (date, description, category, expense, income, month) in rows {
        create(
            &conn,
            date,
            description,
            Some("Main Checking"),
            *category,
            *expense,
            *income,
            month,
        )?;
    }

    println!("Loaded demo data: 2 accounts, {} movements, a 2025-06 payslip", rows.len());
    println!("Try: foyer keywords apply, foyer salary import --month 2025-06, foyer report accounts");
    Ok(())
}
