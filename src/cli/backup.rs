use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use rusqlite::backup::Backup;
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::{db_path, get_data_dir};

fn default_output() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    get_data_dir()
        .join("backups")
        .join(format!("foyer-{stamp}.db"))
}

pub fn run(output: Option<String>) -> Result<()> {
    let path = match output {
        Some(p) => PathBuf::from(p),
        None => default_output(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let source = get_connection(&db_path())?;
    let mut dest = Connection::open(&path)?;
    {
        let backup = Backup::new(&source, &mut dest)?;
        backup.run_to_completion(64, Duration::from_millis(50), None)?;
    }

    println!("Backed up database to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::movements::create;

    #[test]
    fn test_backup_copies_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = get_connection(&dir.path().join("source.db")).unwrap();
        init_db(&source).unwrap();
        source
            .execute("INSERT INTO accounts (name, kind) VALUES ('Main Checking', 'current')", [])
            .unwrap();
        create(&source, "2025-03-02", "Groceries", Some("Main Checking"), None, Some(80.0), None, "2025-03-01").unwrap();

        let target = dir.path().join("backup.db");
        let mut dest = Connection::open(&target).unwrap();
        {
            let backup = Backup::new(&source, &mut dest).unwrap();
            backup
                .run_to_completion(64, Duration::from_millis(50), None)
                .unwrap();
        }

        let count: i64 = dest
            .query_row("SELECT count(*) FROM movements", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
