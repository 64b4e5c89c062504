use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::masterdata;
use crate::settings::db_path;

pub fn add(name: &str, group: &str, provision_kind: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::add_category(&conn, name, group, provision_kind)?;
    println!("Added category: {name} ({group})");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let categories = masterdata::list_categories(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Group", "Order", "Provision"]);
    for category in categories {
        table.add_row(vec![
            Cell::new(category.name),
            Cell::new(category.category_group.unwrap_or_default()),
            Cell::new(category.sort_order),
            Cell::new(category.provision_kind.unwrap_or_default()),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn remove(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::remove_category(&conn, name)?;
    println!("Removed category: {name}");
    Ok(())
}
