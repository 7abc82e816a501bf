//! SQL text generated by the tools.
//!
//! Identifiers and predicates are interpolated verbatim. Values are always
//! bound through `?` placeholders.

pub const DEFAULT_DB_PATH: &str = "database.db";
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
pub const BACKUP_FILE_PREFIX: &str = "backup_";
pub const BACKUP_FILE_EXTENSION: &str = "json";

pub const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type='table'";

#[must_use]
pub fn create_table_sql<'a, I>(table_name: &str, columns: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let column_defs = columns
        .into_iter()
        .map(|(name, declared_type)| format!("{name} {declared_type}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {table_name} ({column_defs})")
}

#[must_use]
pub fn insert_sql<'a, I>(table_name: &str, columns: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let columns: Vec<&str> = columns.into_iter().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table_name} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

#[must_use]
pub fn table_info_sql(table_name: &str) -> String {
    format!("PRAGMA table_info({table_name})")
}

#[must_use]
pub fn select_all_sql(table_name: &str) -> String {
    format!("SELECT * FROM {table_name}")
}

#[must_use]
pub fn select_page_sql(
    table_name: &str,
    where_clause: Option<&str>,
    limit: u64,
    offset: u64,
) -> String {
    let mut query = select_all_sql(table_name);
    push_where(&mut query, where_clause);
    query.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    query
}

#[must_use]
pub fn count_sql(table_name: &str, where_clause: Option<&str>) -> String {
    let mut query = format!("SELECT COUNT(*) FROM {table_name}");
    push_where(&mut query, where_clause);
    query
}

fn push_where(query: &mut String, where_clause: Option<&str>) {
    if let Some(predicate) = where_clause.filter(|predicate| !predicate.is_empty()) {
        query.push_str(" WHERE ");
        query.push_str(predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_keeps_column_order() {
        let sql = create_table_sql("t", [("id", "INTEGER"), ("name", "TEXT")]);
        assert_eq!(sql, "CREATE TABLE IF NOT EXISTS t (id INTEGER, name TEXT)");
    }

    #[test]
    fn insert_uses_one_placeholder_per_column() {
        let sql = insert_sql("t", ["id", "name"]);
        assert_eq!(sql, "INSERT INTO t (id, name) VALUES (?, ?)");
    }

    #[test]
    fn page_and_count_share_the_predicate() {
        assert_eq!(
            select_page_sql("t", Some("id > 1"), 10, 20),
            "SELECT * FROM t WHERE id > 1 LIMIT 10 OFFSET 20"
        );
        assert_eq!(count_sql("t", Some("id > 1")), "SELECT COUNT(*) FROM t WHERE id > 1");
    }

    #[test]
    fn empty_predicate_is_omitted() {
        assert_eq!(select_page_sql("t", Some(""), 100, 0), "SELECT * FROM t LIMIT 100 OFFSET 0");
        assert_eq!(count_sql("t", None), "SELECT COUNT(*) FROM t");
    }
}
