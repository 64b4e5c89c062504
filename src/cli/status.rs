use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{db_path, get_data_dir, load_settings};

fn count(conn: &Connection, table: &str) -> Result<i64> {
    Ok(conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))?)
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let db = db_path();

    println!("Data directory: {}", data_dir.display());
    println!("Database:       {}", db.display());
    if !settings.user_name.is_empty() {
        println!("User:           {}", settings.user_name);
    }
    println!("Salary account: {}", settings.salary_account);

    if !db.exists() {
        println!("\nDatabase not initialized. Run: foyer init");
        return Ok(());
    }
    let size = std::fs::metadata(&db)?.len();
    println!("Size:           {:.1} KiB", size as f64 / 1024.0);

    let conn = get_connection(&db)?;
    println!("\nAccounts:       {}", count(&conn, "accounts")?);
    println!("Categories:     {}", count(&conn, "categories")?);
    println!("Keyword rules:  {}", count(&conn, "keyword_rules")?);
    println!("Movements:      {}", count(&conn, "movements")?);
    println!("Jobs:           {}", count(&conn, "jobs")?);

    let uncategorized: i64 = conn.query_row(
        "SELECT count(*) FROM movements WHERE category IS NULL AND is_excluded = 0",
        [],
        |r| r.get(0),
    )?;
    if uncategorized > 0 {
        println!("\n{uncategorized} movement(s) without a category. Run: foyer keywords apply");
    }
    Ok(())
}
