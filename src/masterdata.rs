use rusqlite::Connection;

use crate::error::{FoyerError, Result};
use crate::models::{Account, Category, Classifier, KeywordRule};

pub fn add_account(conn: &Connection, name: &str, kind: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (name, kind) VALUES (?1, ?2)",
        rusqlite::params![name, kind],
    )?;
    Ok(())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT name, kind, is_active FROM accounts ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Account {
            name: row.get(0)?,
            kind: row.get(1)?,
            is_active: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn remove_account(conn: &Connection, name: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM accounts WHERE name = ?1", [name])?;
    if n == 0 {
        return Err(FoyerError::UnknownAccount(name.to_string()));
    }
    Ok(())
}

pub fn account_kinds(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT kind FROM accounts ORDER BY kind")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn add_category(conn: &Connection, name: &str, group: &str, provision_kind: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (name, category_group, sort_order, provision_kind) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![name, group, crate::db::group_sort_order(group), provision_kind],
    )?;
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT name, category_group, sort_order, provision_kind FROM categories \
         ORDER BY category_group, name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            name: row.get(0)?,
            category_group: row.get(1)?,
            sort_order: row.get(2)?,
            provision_kind: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM categories WHERE name = ?1", [name])?;
    if n == 0 {
        return Err(FoyerError::UnknownCategory(name.to_string()));
    }
    Ok(())
}

pub fn category_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM categories WHERE name = ?1",
        [name],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

pub fn add_keyword(conn: &Connection, keyword: &str, category: &str, match_type: &str) -> Result<()> {
    if !category_exists(conn, category)? {
        return Err(FoyerError::UnknownCategory(category.to_string()));
    }
    conn.execute(
        "INSERT INTO keyword_rules (keyword, category, match_type) VALUES (?1, ?2, ?3)",
        rusqlite::params![keyword, category, match_type],
    )?;
    Ok(())
}

pub fn list_keywords(conn: &Connection) -> Result<Vec<KeywordRule>> {
    let mut stmt =
        conn.prepare("SELECT keyword, category, match_type FROM keyword_rules ORDER BY keyword")?;
    let rows = stmt.query_map([], |row| {
        Ok(KeywordRule {
            keyword: row.get(0)?,
            category: row.get(1)?,
            match_type: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Keyword rules whose pattern matches the given description.
pub fn matching_keywords(conn: &Connection, description: &str) -> Result<Vec<KeywordRule>> {
    let all = list_keywords(conn)?;
    Ok(all
        .into_iter()
        .filter(|rule| crate::categorizer::matches(description, &rule.keyword, &rule.match_type))
        .collect())
}

pub fn add_classifier(conn: &Connection, pattern: &str, class: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO classifiers (pattern, class) VALUES (?1, ?2)",
        rusqlite::params![pattern, class],
    )?;
    Ok(())
}

pub fn list_classifiers(conn: &Connection) -> Result<Vec<Classifier>> {
    let mut stmt = conn.prepare("SELECT pattern, class FROM classifiers ORDER BY class, pattern")?;
    let rows = stmt.query_map([], |row| {
        Ok(Classifier {
            pattern: row.get(0)?,
            class: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
