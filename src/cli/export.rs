use std::path::PathBuf;

use rusqlite::Connection;

use crate::dates::today;
use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{db_path, get_data_dir};

fn default_output() -> PathBuf {
    get_data_dir()
        .join("exports")
        .join(format!("register-{}.csv", today()))
}

fn write_register(conn: &Connection, path: &PathBuf) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "id",
        "date",
        "description",
        "account",
        "category",
        "expense",
        "income",
        "month",
        "label",
        "event_date",
        "declared_by",
    ])?;

    let mut stmt = conn.prepare(
        "SELECT id, date, description, account, category, expense, income, month, \
         user_label, event_date, declared_by \
         FROM movements WHERE is_excluded = 0 ORDER BY month, date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut count = 0;
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let expense: Option<f64> = row.get(5)?;
        let income: Option<f64> = row.get(6)?;
        writer.write_record([
            id.to_string(),
            row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            expense.map(|v| format!("{v:.2}")).unwrap_or_default(),
            income.map(|v| format!("{v:.2}")).unwrap_or_default(),
            crate::fmt::month_label(&row.get::<_, String>(7)?).to_string(),
            row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        ])?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

pub fn run(output: Option<String>) -> Result<()> {
    let path = match output {
        Some(p) => PathBuf::from(p),
        None => default_output(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = get_connection(&db_path())?;
    let count = write_register(&conn, &path)?;
    println!("Exported {count} movement(s) to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::movements::create;

    #[test]
    fn test_write_register() {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute("INSERT INTO accounts (name, kind) VALUES ('Main Checking', 'current')", [])
            .unwrap();
        create(&conn, "2025-03-02", "Groceries", Some("Main Checking"), Some("Groceries"), Some(80.0), None, "2025-03-01").unwrap();
        create(&conn, "2025-03-28", "Salary", Some("Main Checking"), Some("Salary"), None, Some(2500.0), "2025-03-01").unwrap();

        let path = dir.path().join("register.csv");
        let count = write_register(&conn, &path).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,date,description"));
        assert!(content.contains("Groceries"));
        assert!(content.contains("80.00"));
        assert!(content.contains("2025-03"));
    }
}
