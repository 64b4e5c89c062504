use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::dates::{parse_date, parse_month};
use crate::db::get_connection;
use crate::error::{FoyerError, Result};
use crate::fmt::{money, month_label};
use crate::movements::{self, MassPatch, RegisterFilter};
use crate::settings::db_path;
use crate::splitter::{self, SplitMode};

/// Clap's f64 parser accepts NaN and infinities; keep them out of the ledger.
pub(crate) fn check_amount(name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => {
            Err(FoyerError::Other(format!("{name} must be a finite amount, got {v}")))
        }
        _ => Ok(()),
    }
}

pub fn add(
    date: &str,
    description: &str,
    account: Option<&str>,
    category: Option<&str>,
    expense: Option<f64>,
    income: Option<f64>,
    month: Option<&str>,
) -> Result<()> {
    parse_date(date)?;
    check_amount("expense", expense)?;
    check_amount("income", income)?;
    let month = match month {
        Some(m) => parse_month(m)?,
        None => parse_month(date)?,
    };
    let conn = get_connection(&db_path())?;
    let id = movements::create(&conn, date, description, account, category, expense, income, &month)?;
    println!("Created movement {id}: {description}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn list(
    offset: i64,
    limit: i64,
    search: Option<String>,
    category: Option<String>,
    account: Option<String>,
    reimbursable: bool,
    affectable: bool,
) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let filter = RegisterFilter {
        offset,
        limit,
        search,
        category,
        account,
        reimbursable,
        affectable,
    };
    let rows = movements::register(&conn, &filter)?;

    let mut table = Table::new();
    table.set_header(vec!["Id", "Description", "Label", "Category", "Date", "Month", "Balance", "Provision"]);
    for row in &rows {
        let balance = if row.balance < 0.0 {
            money(row.balance).red().to_string()
        } else {
            money(row.balance).green().to_string()
        };
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.description),
            Cell::new(row.user_label.clone().unwrap_or_default()),
            Cell::new(row.category.clone().unwrap_or_default()),
            Cell::new(row.date.clone().unwrap_or_default()),
            Cell::new(month_label(&row.month)),
            Cell::new(balance),
            Cell::new(money(row.provision)),
        ]);
    }
    println!("{table}");
    println!("{} movement(s), offset {offset}", rows.len());
    Ok(())
}

pub fn edit(id: i64, category: &str, label: Option<&str>, month: &str) -> Result<()> {
    let month = parse_month(month)?;
    let conn = get_connection(&db_path())?;
    movements::update_category(&conn, id, category, label, &month)?;
    println!("Updated movement {id}");
    Ok(())
}

pub fn link(id: i64, rate: Option<f64>, event_date: Option<&str>, label: Option<&str>) -> Result<()> {
    if let Some(date) = event_date {
        parse_date(date)?;
    }
    let rate = match rate {
        Some(pct) if !(0.0..=100.0).contains(&pct) => {
            return Err(FoyerError::Other(format!("rate must be 0-100, got {pct}")));
        }
        Some(pct) => Some(pct / 100.0),
        None => None,
    };
    let conn = get_connection(&db_path())?;
    movements::link(&conn, id, rate, event_date, label)?;
    println!("Linked movement {id}");
    Ok(())
}

pub fn deactivate(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let m = movements::get(&conn, id)?;
    movements::deactivate(&conn, id)?;
    println!("Deactivated movement {id}: {} ({})", m.description, money(m.balance()));
    Ok(())
}

pub fn split(id: i64, periods: Option<u32>) -> Result<()> {
    let mode = match periods {
        Some(n) => SplitMode::Custom(n),
        None => SplitMode::Yearly,
    };
    let mut conn = get_connection(&db_path())?;
    let outcome = splitter::split_movement(&mut conn, id, mode)?;
    println!("Split movement {id} into {} part(s)", outcome.children);
    Ok(())
}

/// Parse a signed part given as AMOUNT:YYYY-MM.
fn parse_part(raw: &str) -> Result<(f64, String)> {
    let (amount, month) = raw
        .split_once(':')
        .ok_or_else(|| FoyerError::Other(format!("expected AMOUNT:YYYY-MM, got '{raw}'")))?;
    let amount: f64 = amount
        .parse()
        .map_err(|_| FoyerError::Other(format!("invalid amount in part '{raw}'")))?;
    check_amount("part", Some(amount))?;
    Ok((amount, parse_month(month)?))
}

pub fn split_values(id: i64, parts: &[String]) -> Result<()> {
    let parts: Vec<(f64, String)> = parts.iter().map(|p| parse_part(p)).collect::<Result<_>>()?;
    let mut conn = get_connection(&db_path())?;
    let outcome = splitter::split_values(&mut conn, id, &parts)?;
    println!("Split movement {id} into {} part(s)", outcome.children);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn mass_update(
    ids: &str,
    label: Option<String>,
    reference: Option<String>,
    event_date: Option<String>,
    description: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let ids: Vec<i64> = ids
        .split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| FoyerError::Other(format!("invalid movement id '{part}'")))
        })
        .collect::<Result<_>>()?;
    if let Some(date) = &event_date {
        parse_date(date)?;
    }
    let patch = MassPatch {
        user_label: label,
        reference,
        event_date,
        description,
        category,
    };
    let conn = get_connection(&db_path())?;
    let updated = movements::mass_update(&conn, &ids, &patch)?;
    println!("Updated {updated} movement(s)");
    Ok(())
}

pub fn events(category: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = movements::events(&conn, category)?;

    let mut table = Table::new();
    table.set_header(vec!["Event date", "Label", "Expense", "Income"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.event_date),
            Cell::new(row.user_label.unwrap_or_default()),
            Cell::new(money(row.expense)),
            Cell::new(money(row.income)),
        ]);
    }
    println!("Events for {category}\n{table}");
    Ok(())
}
