use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::JobKind;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    name TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    is_active INTEGER DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    name TEXT PRIMARY KEY,
    category_group TEXT,
    sort_order INTEGER DEFAULT 0,
    provision_kind TEXT
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL,
    month TEXT
);

CREATE TABLE IF NOT EXISTS movements (
    id INTEGER PRIMARY KEY,
    date TEXT,
    description TEXT NOT NULL,
    income REAL,
    expense REAL,
    account TEXT REFERENCES accounts(name),
    category TEXT REFERENCES categories(name),
    is_savings INTEGER DEFAULT 0,
    is_settled INTEGER DEFAULT 0,
    month TEXT NOT NULL,
    inserted_on TEXT NOT NULL,
    provision_to_pay REAL,
    provision_to_recover REAL,
    event_date TEXT,
    provider TEXT,
    is_excluded INTEGER DEFAULT 0,
    reimbursement_rate REAL,
    highlight TEXT,
    number INTEGER NOT NULL DEFAULT 0,
    reference TEXT,
    parent_id INTEGER REFERENCES movements(id),
    initial_expense REAL,
    initial_income REAL,
    user_label TEXT,
    job_id INTEGER NOT NULL REFERENCES jobs(id),
    declared_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_movements_month ON movements(month);
CREATE INDEX IF NOT EXISTS idx_movements_category ON movements(category);

CREATE TABLE IF NOT EXISTS keyword_rules (
    keyword TEXT PRIMARY KEY,
    category TEXT NOT NULL REFERENCES categories(name),
    match_type TEXT DEFAULT 'contains'
);

CREATE TABLE IF NOT EXISTS classifiers (
    pattern TEXT PRIMARY KEY,
    class TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS salary_items (
    id INTEGER PRIMARY KEY,
    category TEXT,
    item TEXT NOT NULL,
    month TEXT NOT NULL,
    value TEXT,
    numeric_value REAL
);

CREATE VIEW IF NOT EXISTS provision_summary AS
SELECT
    c.category_group AS category_group,
    m.category AS category,
    m.month AS month,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.income, 0) ELSE 0 END) AS current_income,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.provision_to_recover, 0) ELSE 0 END) AS current_income_provisioned,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.provision_to_recover, 0) - COALESCE(m.income, 0) ELSE 0 END) AS current_income_left,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.expense, 0) ELSE 0 END) AS current_expense,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.provision_to_pay, 0) ELSE 0 END) AS current_expense_provisioned,
    SUM(CASE WHEN m.is_savings = 0 THEN COALESCE(m.provision_to_pay, 0) - COALESCE(m.expense, 0) ELSE 0 END) AS current_expense_left,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.income, 0) ELSE 0 END) AS saved_income,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.provision_to_recover, 0) ELSE 0 END) AS saved_income_provisioned,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.provision_to_recover, 0) - COALESCE(m.income, 0) ELSE 0 END) AS saved_income_left,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.expense, 0) ELSE 0 END) AS saved_expense,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.provision_to_pay, 0) ELSE 0 END) AS saved_expense_provisioned,
    SUM(CASE WHEN m.is_savings = 1 THEN COALESCE(m.provision_to_pay, 0) - COALESCE(m.expense, 0) ELSE 0 END) AS saved_expense_left
FROM movements m
LEFT JOIN categories c ON c.name = m.category
WHERE m.is_excluded = 0
GROUP BY c.category_group, m.category, m.month;

CREATE VIEW IF NOT EXISTS account_balances AS
SELECT
    a.name AS account,
    a.kind AS kind,
    MAX(m.date) AS last_date,
    SUM(COALESCE(m.income, 0)) - SUM(COALESCE(m.expense, 0)) AS balance
FROM accounts a
JOIN movements m ON m.account = a.name
WHERE m.is_excluded = 0
GROUP BY a.name, a.kind;

CREATE VIEW IF NOT EXISTS net_salaries AS
SELECT
    month,
    SUM(CASE WHEN item = 'net_salary' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS net_salary,
    SUM(CASE WHEN item = 'net_bonus' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS net_bonus,
    SUM(CASE WHEN item = 'salary_tax' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS salary_tax,
    SUM(CASE WHEN item = 'bonus_tax' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS bonus_tax,
    SUM(CASE WHEN item = 'housing' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS housing,
    SUM(CASE WHEN item = 'other' THEN COALESCE(numeric_value, 0) ELSE 0 END) AS other,
    SUM(COALESCE(numeric_value, 0)) AS total
FROM salary_items
GROUP BY month;
";

// (name, category_group, provision_kind)
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Salary", "01 Income", "none"),
    ("Housing Allowance", "01 Income", "none"),
    ("Expense Reports", "01 Income", "none"),
    ("Income Tax", "02 Taxes", "current"),
    ("Rent", "03 Housing", "current"),
    ("Utilities", "03 Housing", "current"),
    ("Groceries", "04 Daily Life", "current"),
    ("Health", "05 Health", "current"),
    ("Transport", "06 Transport", "current"),
    ("Leisure", "07 Leisure", "current"),
    ("Vacation", "08 Savings Goals", "savings"),
    ("Home Projects", "08 Savings Goals", "savings"),
    ("Savings", "09 Savings", "savings"),
    ("Other", "99 Other", "none"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// The two-digit group prefix doubles as the sort order, e.g. "03 Housing" -> 3.
pub fn group_sort_order(group: &str) -> i64 {
    group
        .get(..2)
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(0)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for (name, group, provision_kind) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (name, category_group, sort_order, provision_kind) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, group, group_sort_order(group), provision_kind],
            )?;
        }
    }
    Ok(())
}

/// Insert a batch marker and return its id.
pub fn create_job(conn: &Connection, kind: JobKind, month: Option<&str>) -> Result<i64> {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    conn.execute(
        "INSERT INTO jobs (kind, created_at, month) VALUES (?1, ?2, ?3)",
        rusqlite::params![kind.as_str(), now, month],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["accounts", "categories", "jobs", "movements", "keyword_rules", "classifiers", "salary_items"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_creates_views() {
        let (_dir, conn) = test_db();
        let views: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='view'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["provision_summary", "account_balances", "net_salaries"] {
            assert!(views.contains(&expected.to_string()), "missing view: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_init_db_seeds_categories() {
        let (_dir, conn) = test_db();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        assert!(count >= 14, "expected at least 14 categories, got {count}");
        let kind: String = conn
            .query_row("SELECT provision_kind FROM categories WHERE name = 'Vacation'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(kind, "savings");
    }

    #[test]
    fn test_group_sort_order() {
        assert_eq!(group_sort_order("03 Housing"), 3);
        assert_eq!(group_sort_order("99 Other"), 99);
        assert_eq!(group_sort_order("no prefix"), 0);
    }

    #[test]
    fn test_create_job() {
        let (_dir, conn) = test_db();
        let id = create_job(&conn, JobKind::Split, None).unwrap();
        let kind: String = conn
            .query_row("SELECT kind FROM jobs WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();
        assert_eq!(kind, "split");
        let with_month = create_job(&conn, JobKind::Salary, Some("2025-06-01")).unwrap();
        let month: Option<String> = conn
            .query_row("SELECT month FROM jobs WHERE id = ?1", [with_month], |r| r.get(0))
            .unwrap();
        assert_eq!(month.as_deref(), Some("2025-06-01"));
    }
}
