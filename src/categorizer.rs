use regex::Regex;
use rusqlite::Connection;

use crate::error::Result;

pub fn matches(description: &str, pattern: &str, match_type: &str) -> bool {
    let desc_upper = description.to_uppercase();
    let pat_upper = pattern.to_uppercase();
    match match_type {
        "contains" => desc_upper.contains(&pat_upper),
        "starts_with" => desc_upper.starts_with(&pat_upper),
        "regex" => Regex::new(pattern)
            .map(|re| re.is_match(description))
            .unwrap_or(false),
        _ => false,
    }
}

pub struct ApplyResult {
    pub categorized: usize,
    pub unmatched: usize,
}

/// Assign categories to uncategorized movements from the keyword rules.
/// Longer keywords win over shorter ones.
pub fn apply_keywords(conn: &Connection) -> Result<ApplyResult> {
    let mut rule_stmt = conn.prepare(
        "SELECT keyword, match_type, category FROM keyword_rules \
         ORDER BY LENGTH(keyword) DESC",
    )?;
    let rules: Vec<(String, String, String)> = rule_stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut mvt_stmt = conn.prepare(
        "SELECT id, description FROM movements WHERE category IS NULL AND is_excluded = 0",
    )?;
    let uncategorized: Vec<(i64, String)> = mvt_stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut categorized = 0usize;
    let mut unmatched = 0usize;

    for (id, description) in &uncategorized {
        let hit = rules
            .iter()
            .find(|(keyword, match_type, _)| matches(description, keyword, match_type));
        match hit {
            Some((_, _, category)) => {
                conn.execute(
                    "UPDATE movements SET category = ?1 WHERE id = ?2",
                    rusqlite::params![category, id],
                )?;
                categorized += 1;
            }
            None => unmatched += 1,
        }
    }

    Ok(ApplyResult {
        categorized,
        unmatched,
    })
}
