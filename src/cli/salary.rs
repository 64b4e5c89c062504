use comfy_table::{Cell, Table};

use crate::dates::parse_month;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, month_label};
use crate::salary;
use crate::settings::{db_path, load_settings};

pub fn months() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let months = salary::recent_months(&conn)?;
    if months.is_empty() {
        println!("No payslip data");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Net salary", "Bonus", "Total"]);
    for month in months {
        let slip = salary::slip(&conn, &month)?;
        table.add_row(vec![
            Cell::new(month_label(&month)),
            Cell::new(money(slip.net_salary)),
            Cell::new(money(slip.net_bonus)),
            Cell::new(money(slip.total)),
        ]);
    }
    println!("Payslips\n{table}");
    Ok(())
}

pub fn import(
    month: &str,
    declared_by: Option<&str>,
    account: Option<&str>,
    simulate: bool,
) -> Result<()> {
    let month = parse_month(month)?;
    let settings = load_settings();
    let declared_by = declared_by.unwrap_or(&settings.user_name);
    let account = account.unwrap_or(&settings.salary_account);

    let mut conn = get_connection(&db_path())?;
    let outcome = salary::import(&mut conn, &month, account, declared_by, simulate)?;

    if outcome.simulated {
        println!(
            "Simulated: {} entries for {} (rolled back)",
            outcome.entries,
            month_label(&month)
        );
    } else {
        println!("Imported {} entries for {}", outcome.entries, month_label(&month));
    }
    match outcome.deposit_id {
        Some(id) => println!("Bank deposit {id} neutralized"),
        None => println!("No matching bank deposit found"),
    }
    Ok(())
}
