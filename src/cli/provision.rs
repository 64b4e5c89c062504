use comfy_table::{Cell, Table};

use crate::dates::parse_month;
use crate::db::get_connection;
use crate::error::{FoyerError, Result};
use crate::fmt::{money, month_label};
use crate::provisions;
use crate::settings::db_path;

pub fn generate(
    category: &str,
    year: i32,
    description: &str,
    to_pay: Option<f64>,
    to_recover: Option<f64>,
) -> Result<()> {
    if to_pay.is_none() && to_recover.is_none() {
        return Err(FoyerError::Other(
            "provide --to-pay and/or --to-recover".to_string(),
        ));
    }
    super::tx::check_amount("to-pay", to_pay)?;
    super::tx::check_amount("to-recover", to_recover)?;
    let mut conn = get_connection(&db_path())?;
    provisions::generate(&mut conn, category, year, description, to_pay, to_recover)?;
    println!("Generated 12 provision rows for {category} in {year}");
    Ok(())
}

pub fn remaining() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = provisions::remaining(&conn)?;
    if rows.is_empty() {
        println!("No remaining provisions");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Category", "Remaining"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(month_label(&row.month)),
            Cell::new(row.category),
            Cell::new(money(row.remaining)),
        ]);
    }
    println!("Remaining provisions\n{table}");
    Ok(())
}

pub fn close(month: &str, category: &str) -> Result<()> {
    let month = parse_month(month)?;
    let conn = get_connection(&db_path())?;
    let rows = provisions::remaining(&conn)?;
    let target = rows
        .iter()
        .find(|r| r.month == month && r.category == category)
        .ok_or_else(|| {
            FoyerError::Other(format!("no remaining provision for {category} in {month}"))
        })?;
    provisions::close(&conn, &month, category, target.remaining)?;
    println!(
        "Closed {} of {category} provision for {}",
        money(target.remaining),
        month_label(&month)
    );
    Ok(())
}
