use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::dates::{current_month, parse_month};
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, month_label};
use crate::reports;
use crate::settings::db_path;

fn signed(amount: f64) -> String {
    if amount < 0.0 {
        money(amount).red().to_string()
    } else {
        money(amount).green().to_string()
    }
}

pub fn balances(from_month: Option<&str>) -> Result<()> {
    let first = match from_month {
        Some(m) => parse_month(m)?,
        None => {
            // default to January of the current year
            let mut m = current_month();
            m.replace_range(5..7, "01");
            m
        }
    };
    let conn = get_connection(&db_path())?;
    let rows = reports::monthly_balances(&conn, &first)?;

    let mut table = Table::new();
    table.set_header(vec!["Month", "Expense", "Income", "Net"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(month_label(&row.month)),
            Cell::new(money(row.expense)),
            Cell::new(money(row.income)),
            Cell::new(signed(row.net)),
        ]);
    }
    println!("Monthly balances\n{table}");
    Ok(())
}

pub fn accounts(kind: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    if let Some(kind) = kind {
        let known = crate::masterdata::account_kinds(&conn)?;
        if !known.iter().any(|k| k == kind) {
            println!("No account has kind '{kind}' (known: {})", known.join(", "));
            return Ok(());
        }
    }
    let rows = reports::account_balances(&conn, kind)?;

    let mut table = Table::new();
    table.set_header(vec!["Account", "Kind", "Last movement", "Balance"]);
    let mut total = 0.0;
    for row in rows {
        total += row.balance;
        table.add_row(vec![
            Cell::new(row.account),
            Cell::new(row.kind),
            Cell::new(row.last_date.unwrap_or_default()),
            Cell::new(signed(row.balance)),
        ]);
    }
    println!("Account balances\n{table}");
    println!("Total: {}", signed(total));
    Ok(())
}

pub fn provisions(month: &str, savings: bool) -> Result<()> {
    let month = parse_month(month)?;
    let conn = get_connection(&db_path())?;
    let rows = reports::month_provisions(&conn, &month, savings)?;

    let mut table = Table::new();
    table.set_header(vec![
        "Group",
        "Category",
        "Income",
        "Provisioned",
        "Left",
        "Expense",
        "Provisioned",
        "Left",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.category_group.unwrap_or_default()),
            Cell::new(row.category.unwrap_or_default()),
            Cell::new(money(row.income)),
            Cell::new(money(row.income_provisioned)),
            Cell::new(money(row.income_left)),
            Cell::new(money(row.expense)),
            Cell::new(money(row.expense_provisioned)),
            Cell::new(money(row.expense_left)),
        ]);
    }
    let scope = if savings { "savings" } else { "current" };
    println!("Provisions ({scope}) for {}\n{table}", month_label(&month));
    Ok(())
}

pub fn category(category: &str, month: &str) -> Result<()> {
    let month = parse_month(month)?;
    let conn = get_connection(&db_path())?;
    let rows = reports::categorized_provisions(&conn, category, &month)?;

    let mut table = Table::new();
    table.set_header(vec!["Class", "Expense", "To pay", "Income", "To recover"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.class),
            Cell::new(money(row.expense)),
            Cell::new(money(row.provision_to_pay)),
            Cell::new(money(row.income)),
            Cell::new(money(row.provision_to_recover)),
        ]);
    }
    println!("{category} for {}\n{table}", month_label(&month));
    Ok(())
}
