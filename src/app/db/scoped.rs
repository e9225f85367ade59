//! Generic tenant-scoped listing.
//!
//! Employee, department and job position listings are the same query with
//! different tables, columns and status predicates, so they share one
//! builder instead of three copies. Every query here filters by company id;
//! rows from other tenants are structurally unreachable.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::app::domain::CompanyId;
use crate::app::envelope::Page;

/// Clamp a 1-based page number.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// Clamp a page size or typeahead limit into [1, 100].
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, 100)
}

/// A tenant-scoped query over one entity table. `status_where` selects the
/// visible lifecycle slice; active and archived slices are disjoint by
/// construction.
pub struct ScopedQuery {
    pub table: &'static str,
    /// SELECT list; may contain correlated subqueries for joined names.
    pub columns: &'static str,
    /// Searched, and primary sort key (collation-aware, id tiebreak).
    pub name_column: &'static str,
    pub status_where: &'static str,
}

impl ScopedQuery {
    /// Offset/limit page with optional case-insensitive substring search.
    pub async fn page<R>(
        &self,
        pool: &SqlitePool,
        company_id: CompanyId,
        page: i64,
        per_page: i64,
        search: &str,
    ) -> Result<Page<R>, sqlx::Error>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + Serialize,
    {
        let page = clamp_page(page);
        let per_page = clamp_limit(per_page);
        let offset = (page - 1) * per_page;

        let search = search.trim();
        let mut where_sql = format!("company_id = ? AND {}", self.status_where);
        if !search.is_empty() {
            where_sql.push_str(&format!(" AND {} LIKE ?", self.name_column));
        }

        let count_sql = format!("SELECT count(*) FROM {} WHERE {}", self.table, where_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(company_id.as_i64());
        if !search.is_empty() {
            count_query = count_query.bind(format!("%{search}%"));
        }
        let total = count_query.fetch_one(pool).await?;

        let data_sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} COLLATE NOCASE, id LIMIT ? OFFSET ?",
            self.columns, self.table, where_sql, self.name_column
        );
        let mut data_query = sqlx::query_as::<_, R>(&data_sql).bind(company_id.as_i64());
        if !search.is_empty() {
            data_query = data_query.bind(format!("%{search}%"));
        }
        let data = data_query
            .bind(per_page)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Page::new(data, total, page, per_page))
    }

    /// Typeahead helper: substring match over the name column, limit clamped
    /// into [1, 100].
    pub async fn typeahead<R>(
        &self,
        pool: &SqlitePool,
        company_id: CompanyId,
        query: &str,
        limit: i64,
    ) -> Result<Vec<R>, sqlx::Error>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let limit = clamp_limit(limit);
        let sql = format!(
            "SELECT {} FROM {} WHERE company_id = ? AND {} AND {} LIKE ? \
             ORDER BY {} COLLATE NOCASE, id LIMIT ?",
            self.columns, self.table, self.status_where, self.name_column, self.name_column
        );
        sqlx::query_as::<_, R>(&sql)
            .bind(company_id.as_i64())
            .bind(format!("%{}%", query.trim()))
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps() {
        assert_eq!(clamp_page(-3), 1);
        assert_eq!(clamp_page(2), 2);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(250), 100);
        assert_eq!(clamp_limit(10), 10);
    }
}
