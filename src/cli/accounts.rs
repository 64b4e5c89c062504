use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::masterdata;
use crate::settings::db_path;

pub fn add(name: &str, kind: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::add_account(&conn, name, kind)?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let accounts = masterdata::list_accounts(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Kind", "Active"]);
    for account in accounts {
        table.add_row(vec![
            Cell::new(account.name),
            Cell::new(account.kind),
            Cell::new(if account.is_active { "yes" } else { "no" }),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

pub fn remove(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::remove_account(&conn, name)?;
    println!("Removed account: {name}");
    Ok(())
}
