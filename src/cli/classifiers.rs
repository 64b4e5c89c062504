use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::masterdata;
use crate::settings::db_path;

pub fn add(pattern: &str, class: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::add_classifier(&conn, pattern, class)?;
    println!("Added classifier '{pattern}' -> {class}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let classifiers = masterdata::list_classifiers(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Pattern", "Class"]);
    for classifier in classifiers {
        table.add_row(vec![
            Cell::new(classifier.pattern),
            Cell::new(classifier.class),
        ]);
    }
    println!("Classifiers\n{table}");
    Ok(())
}
