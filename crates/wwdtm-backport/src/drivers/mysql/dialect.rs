//! MySQL SQL text for the statements the transfer engine issues.
//!
//! Identifiers are backtick-quoted and every value is a `?` placeholder.

use crate::core::SelectQuery;

/// MySQL/MariaDB statement builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    pub fn new() -> Self {
        Self
    }

    /// Quote a MySQL identifier, doubling embedded backticks.
    pub fn quote_ident(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn column_list(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .map(|c| self.quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Full-table SELECT. The filter value, if any, is the only parameter.
    pub fn build_select(&self, query: &SelectQuery) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.column_list(&query.columns),
            self.quote_ident(query.table)
        );

        if let Some((column, _)) = &query.filter {
            sql.push_str(&format!(" WHERE {} = ?", self.quote_ident(column)));
        }

        sql.push_str(&format!(" ORDER BY {} ASC", self.quote_ident(query.order_by)));
        sql
    }

    /// Single-row INSERT with one placeholder per column.
    pub fn build_insert(&self, table: &str, columns: &[&str]) -> String {
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote_ident(table),
            self.column_list(columns),
            placeholders
        )
    }

    /// Single-column UPDATE. Parameters: new value, then key.
    pub fn build_update(&self, table: &str, key_column: &str, column: &str) -> String {
        format!(
            "UPDATE {} SET {} = ? WHERE {} = ?",
            self.quote_ident(table),
            self.quote_ident(column),
            self.quote_ident(key_column)
        )
    }
}
