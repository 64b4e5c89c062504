use rusqlite::Connection;

use crate::dates::today;
use crate::db::create_job;
use crate::error::{FoyerError, Result};
use crate::fmt::round2;
use crate::models::{JobKind, Movement, MOVEMENT_COLUMNS};

/// Highest transaction number in use. Fresh inserts get max + 1; split children
/// and salary sub-entries reuse their parent's number.
pub fn max_number(conn: &Connection) -> Result<i64> {
    let max: Option<i64> = conn.query_row("SELECT MAX(number) FROM movements", [], |r| r.get(0))?;
    Ok(max.unwrap_or(0))
}

/// Low-level insert of a fully populated movement (id ignored). Returns the new id.
pub fn insert(conn: &Connection, m: &Movement) -> Result<i64> {
    conn.execute(
        "INSERT INTO movements (date, description, income, expense, account, category, \
         is_savings, is_settled, month, inserted_on, provision_to_pay, provision_to_recover, \
         event_date, provider, is_excluded, reimbursement_rate, highlight, number, reference, \
         parent_id, initial_expense, initial_income, user_label, job_id, declared_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
         ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)",
        rusqlite::params![
            m.date,
            m.description,
            m.income,
            m.expense,
            m.account,
            m.category,
            m.is_savings,
            m.is_settled,
            m.month,
            m.inserted_on,
            m.provision_to_pay,
            m.provision_to_recover,
            m.event_date,
            m.provider,
            m.is_excluded,
            m.reimbursement_rate,
            m.highlight,
            m.number,
            m.reference,
            m.parent_id,
            m.initial_expense,
            m.initial_income,
            m.user_label,
            m.job_id,
            m.declared_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Create a user-entered transaction under a fresh `import` job.
pub fn create(
    conn: &Connection,
    date: &str,
    description: &str,
    account: Option<&str>,
    category: Option<&str>,
    expense: Option<f64>,
    income: Option<f64>,
    month: &str,
) -> Result<i64> {
    let number = max_number(conn)? + 1;
    let job_id = create_job(conn, JobKind::Import, None)?;
    insert(
        conn,
        &Movement {
            date: Some(date.to_string()),
            description: description.to_string(),
            income,
            expense,
            account: account.map(str::to_string),
            category: category.map(str::to_string),
            month: month.to_string(),
            inserted_on: today(),
            number,
            job_id,
            ..Movement::default()
        },
    )
}

pub fn get(conn: &Connection, id: i64) -> Result<Movement> {
    let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM movements WHERE id = ?1");
    conn.query_row(&sql, [id], Movement::from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => FoyerError::MovementNotFound(id),
            other => other.into(),
        })
}

/// Take a movement out of every aggregate without deleting it.
pub fn deactivate(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("UPDATE movements SET is_excluded = 1 WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(FoyerError::MovementNotFound(id));
    }
    Ok(())
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    category: &str,
    user_label: Option<&str>,
    month: &str,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE movements SET category = ?1, user_label = ?2, month = ?3 WHERE id = ?4",
        rusqlite::params![category, user_label, month, id],
    )?;
    if n == 0 {
        return Err(FoyerError::MovementNotFound(id));
    }
    Ok(())
}

/// Attach a movement to a reimbursement event. For an expense with a rate the
/// expected reimbursement is written to provision_to_recover.
pub fn link(
    conn: &Connection,
    id: i64,
    rate: Option<f64>,
    event_date: Option<&str>,
    user_label: Option<&str>,
) -> Result<()> {
    let m = get(conn, id)?;
    if let Some(rate) = rate {
        if m.expense.unwrap_or(0.0) > 0.0 {
            let expected = round2(m.expense.unwrap_or(0.0) * rate);
            conn.execute(
                "UPDATE movements SET reimbursement_rate = ?1, provision_to_recover = ?2 WHERE id = ?3",
                rusqlite::params![rate, expected, id],
            )?;
        }
    }
    if let Some(date) = event_date {
        conn.execute(
            "UPDATE movements SET event_date = ?1 WHERE id = ?2",
            rusqlite::params![date, id],
        )?;
    }
    if let Some(label) = user_label {
        conn.execute(
            "UPDATE movements SET user_label = ?1 WHERE id = ?2",
            rusqlite::params![label, id],
        )?;
    }
    Ok(())
}

/// Template for a mass update. Label, reference and event date overwrite the
/// targets even when empty; description and category only apply when present.
#[derive(Debug, Default, Clone)]
pub struct MassPatch {
    pub user_label: Option<String>,
    pub reference: Option<String>,
    pub event_date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

pub fn mass_update(conn: &Connection, ids: &[i64], patch: &MassPatch) -> Result<usize> {
    let mut updated = 0;
    for id in ids {
        let n = conn.execute(
            "UPDATE movements SET user_label = ?1, reference = ?2, event_date = ?3 WHERE id = ?4",
            rusqlite::params![patch.user_label, patch.reference, patch.event_date, id],
        )?;
        if n == 0 {
            continue;
        }
        if let Some(desc) = &patch.description {
            conn.execute(
                "UPDATE movements SET description = ?1 WHERE id = ?2",
                rusqlite::params![desc, id],
            )?;
        }
        if let Some(cat) = &patch.category {
            conn.execute(
                "UPDATE movements SET category = ?1 WHERE id = ?2",
                rusqlite::params![cat, id],
            )?;
        }
        updated += 1;
    }
    Ok(updated)
}

/// Register filters. `reimbursable` selects expenses still lacking a rate,
/// label or event date; `affectable` selects incomes lacking label or event date.
#[derive(Debug, Default, Clone)]
pub struct RegisterFilter {
    pub offset: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub reimbursable: bool,
    pub affectable: bool,
}

/// One register line with the computed balance and provision columns.
#[derive(Debug, Clone)]
pub struct RegisterRow {
    pub id: i64,
    pub description: String,
    pub user_label: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub month: String,
    pub balance: f64,
    pub provision: f64,
}

pub fn register(conn: &Connection, filter: &RegisterFilter) -> Result<Vec<RegisterRow>> {
    let mut clauses = vec!["is_excluded = 0".to_string()];
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(search) = &filter.search {
        params.push(Box::new(format!("%{search}%")));
        clauses.push(format!("description LIKE ?{}", params.len()));
    }
    if let Some(category) = &filter.category {
        params.push(Box::new(category.clone()));
        clauses.push(format!("category = ?{}", params.len()));
    }
    if let Some(account) = &filter.account {
        params.push(Box::new(account.clone()));
        clauses.push(format!("account = ?{}", params.len()));
    }
    if filter.reimbursable {
        clauses.push(
            "expense > 0 AND (reimbursement_rate IS NULL OR user_label IS NULL OR event_date IS NULL)"
                .to_string(),
        );
    }
    if filter.affectable {
        clauses.push("income > 0 AND (user_label IS NULL OR event_date IS NULL)".to_string());
    }

    let limit = if filter.limit > 0 { filter.limit } else { 20 };
    let sql = format!(
        "SELECT id, description, user_label, category, date, month, \
         COALESCE(income, 0) - COALESCE(expense, 0), \
         COALESCE(provision_to_recover, 0) - COALESCE(provision_to_pay, 0) \
         FROM movements WHERE {} ORDER BY id DESC LIMIT {} OFFSET {}",
        clauses.join(" AND "),
        limit,
        filter.offset
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_refs.as_slice(), |row| {
        Ok(RegisterRow {
            id: row.get(0)?,
            description: row.get(1)?,
            user_label: row.get(2)?,
            category: row.get(3)?,
            date: row.get(4)?,
            month: row.get(5)?,
            balance: row.get(6)?,
            provision: row.get(7)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

#[derive(Debug, Clone)]
pub struct EventRow {
    pub event_date: String,
    pub user_label: Option<String>,
    pub expense: f64,
    pub income: f64,
}

/// Last 50 reimbursement events for a category, newest first.
pub fn events(conn: &Connection, category: &str) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT event_date, user_label, SUM(COALESCE(expense, 0)), SUM(COALESCE(income, 0)) \
         FROM movements \
         WHERE event_date IS NOT NULL AND category = ?1 AND is_excluded = 0 \
         GROUP BY event_date, user_label \
         ORDER BY event_date DESC LIMIT 50",
    )?;
    let rows = stmt.query_map([category], |row| {
        Ok(EventRow {
            event_date: row.get(0)?,
            user_label: row.get(1)?,
            expense: row.get(2)?,
            income: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        conn.execute("INSERT INTO accounts (name, kind) VALUES ('Main Checking', 'current')", [])
            .unwrap();
        (dir, conn)
    }

    #[test]
    fn test_create_assigns_next_number() {
        let (_dir, conn) = test_db();
        let a = create(&conn, "2025-03-02", "Bakery", Some("Main Checking"), Some("Groceries"), Some(12.5), None, "2025-03-01").unwrap();
        let b = create(&conn, "2025-03-03", "Market", Some("Main Checking"), Some("Groceries"), Some(30.0), None, "2025-03-01").unwrap();
        assert_eq!(get(&conn, a).unwrap().number, 1);
        assert_eq!(get(&conn, b).unwrap().number, 2);
        let kind: String = conn
            .query_row(
                "SELECT j.kind FROM jobs j JOIN movements m ON m.job_id = j.id WHERE m.id = ?1",
                [a],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(kind, "import");
    }

    #[test]
    fn test_get_missing_movement() {
        let (_dir, conn) = test_db();
        assert!(matches!(get(&conn, 999), Err(FoyerError::MovementNotFound(999))));
    }

    #[test]
    fn test_deactivate_hides_from_register() {
        let (_dir, conn) = test_db();
        let id = create(&conn, "2025-03-02", "Bakery", None, Some("Groceries"), Some(12.5), None, "2025-03-01").unwrap();
        assert_eq!(register(&conn, &RegisterFilter::default()).unwrap().len(), 1);
        deactivate(&conn, id).unwrap();
        assert!(register(&conn, &RegisterFilter::default()).unwrap().is_empty());
        assert!(get(&conn, id).unwrap().is_excluded);
    }

    #[test]
    fn test_register_filters() {
        let (_dir, conn) = test_db();
        create(&conn, "2025-03-02", "CB CARREFOUR", Some("Main Checking"), Some("Groceries"), Some(80.0), None, "2025-03-01").unwrap();
        create(&conn, "2025-03-05", "PHARMACY", Some("Main Checking"), Some("Health"), Some(25.0), None, "2025-03-01").unwrap();
        create(&conn, "2025-03-06", "REFUND CPAM", Some("Main Checking"), Some("Health"), None, Some(17.5), "2025-03-01").unwrap();

        let by_search = register(&conn, &RegisterFilter { search: Some("CARREFOUR".into()), ..Default::default() }).unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].balance, -80.0);

        let by_category = register(&conn, &RegisterFilter { category: Some("Health".into()), ..Default::default() }).unwrap();
        assert_eq!(by_category.len(), 2);

        let reimbursable = register(&conn, &RegisterFilter { reimbursable: true, ..Default::default() }).unwrap();
        assert_eq!(reimbursable.len(), 2);

        let affectable = register(&conn, &RegisterFilter { affectable: true, ..Default::default() }).unwrap();
        assert_eq!(affectable.len(), 1);
        assert_eq!(affectable[0].balance, 17.5);
    }

    #[test]
    fn test_link_sets_expected_reimbursement() {
        let (_dir, conn) = test_db();
        let id = create(&conn, "2025-03-05", "PHARMACY", None, Some("Health"), Some(25.0), None, "2025-03-01").unwrap();
        link(&conn, id, Some(0.7), Some("2025-03-05"), Some("Flu")).unwrap();
        let m = get(&conn, id).unwrap();
        assert_eq!(m.reimbursement_rate, Some(0.7));
        assert_eq!(m.provision_to_recover, Some(17.5));
        assert_eq!(m.event_date.as_deref(), Some("2025-03-05"));
        assert_eq!(m.user_label.as_deref(), Some("Flu"));
    }

    #[test]
    fn test_mass_update_clears_unconditional_fields() {
        let (_dir, conn) = test_db();
        let a = create(&conn, "2025-03-02", "Bakery", None, Some("Groceries"), Some(12.5), None, "2025-03-01").unwrap();
        link(&conn, a, None, Some("2025-03-02"), Some("Old label")).unwrap();
        let patch = MassPatch {
            user_label: Some("Trip".into()),
            category: Some("Leisure".into()),
            ..Default::default()
        };
        assert_eq!(mass_update(&conn, &[a, 999], &patch).unwrap(), 1);
        let m = get(&conn, a).unwrap();
        assert_eq!(m.user_label.as_deref(), Some("Trip"));
        assert_eq!(m.category.as_deref(), Some("Leisure"));
        // event_date not in the patch, so it is wiped
        assert!(m.event_date.is_none());
        // description absent from the patch stays untouched
        assert_eq!(m.description, "Bakery");
    }

    #[test]
    fn test_events_aggregate_by_date_and_label() {
        let (_dir, conn) = test_db();
        for amount in [25.0, 15.0] {
            let id = create(&conn, "2025-03-05", "PHARMACY", None, Some("Health"), Some(amount), None, "2025-03-01").unwrap();
            link(&conn, id, None, Some("2025-03-05"), Some("Flu")).unwrap();
        }
        let rows = events(&conn, "Health").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expense, 40.0);
        assert_eq!(rows[0].user_label.as_deref(), Some("Flu"));
    }
}
