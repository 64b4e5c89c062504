use comfy_table::{Cell, Table};

use crate::categorizer::apply_keywords;
use crate::db::get_connection;
use crate::error::Result;
use crate::masterdata;
use crate::settings::db_path;

pub fn add(keyword: &str, category: &str, match_type: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    masterdata::add_keyword(&conn, keyword, category, match_type)?;
    println!("Added keyword '{keyword}' -> {category}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rules = masterdata::list_keywords(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Keyword", "Category", "Match"]);
    for rule in rules {
        table.add_row(vec![
            Cell::new(rule.keyword),
            Cell::new(rule.category),
            Cell::new(rule.match_type),
        ]);
    }
    println!("Keyword rules\n{table}");
    Ok(())
}

pub fn apply() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let result = apply_keywords(&conn)?;
    println!(
        "Categorized {} movement(s), {} left without a match",
        result.categorized, result.unmatched
    );
    Ok(())
}

pub fn matching(description: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rules = masterdata::matching_keywords(&conn, description)?;
    if rules.is_empty() {
        println!("No keyword rule matches: {description}");
        return Ok(());
    }
    for rule in rules {
        println!("{} -> {}", rule.keyword, rule.category);
    }
    Ok(())
}
