use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::pkg::internal::{
    adaptors::jobs::spec::JobEntry,
    jobs::{
        error::Result,
        paginate::{SortOrder, Window},
        query::{JobQuery, Predicate},
    },
};

pub const COLUMNS: &str = "id, job_title, company_name, company_logo, location, job_type, experience, \
     salary_min, salary_max, salary, application_deadline, job_description, description, \
     is_draft, is_active, posted_by, applicants, views, created_at, updated_at";

const SEARCH_VECTOR: &str =
    "to_tsvector('english', job_title || ' ' || company_name || ' ' || job_description)";

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &mut self,
        query: &JobQuery,
        sort: SortOrder,
        window: Window,
    ) -> Result<Vec<JobEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM jobs", COLUMNS));
        push_where(&mut qb, query);
        push_order(&mut qb, query, sort);
        qb.push(" LIMIT ")
            .push_bind(window.limit as i64)
            .push(" OFFSET ")
            .push_bind(window.skip as i64);
        let rows = qb
            .build_query_as::<JobEntry>()
            .fetch_all(&mut *self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&mut self, query: &JobQuery) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_where(&mut qb, query);
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    pub async fn ping(&mut self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&mut *self.pool).await?;
        Ok(())
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, query: &JobQuery) {
    qb.push(" WHERE TRUE");
    for predicate in query.predicates() {
        qb.push(" AND ");
        match predicate {
            Predicate::Listed => {
                qb.push("is_active AND NOT is_draft");
            }
            Predicate::Text(text) => {
                qb.push(SEARCH_VECTOR).push(" @@ ");
                push_tsquery(qb, text);
            }
            Predicate::LocationContains(needle) => {
                qb.push("location ILIKE ")
                    .push_bind(format!("%{}%", escape_like(needle)));
            }
            Predicate::JobTypeIs(job_type) => {
                qb.push("job_type = ").push_bind(*job_type);
            }
            Predicate::SalaryFloor(floor) => {
                qb.push("(salary_min >= ")
                    .push_bind(*floor)
                    .push(" OR salary_min IS NULL)");
            }
            Predicate::SalaryCeiling(ceiling) => {
                qb.push("(salary_max <= ")
                    .push_bind(*ceiling)
                    .push(" OR salary_max IS NULL)");
            }
        }
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, query: &JobQuery, sort: SortOrder) {
    match (sort, query.search()) {
        (SortOrder::Oldest, _) => {
            qb.push(" ORDER BY created_at ASC");
        }
        (SortOrder::SalaryHigh, _) => {
            qb.push(" ORDER BY COALESCE(salary_max, 0) DESC, created_at DESC");
        }
        (SortOrder::SalaryLow, _) => {
            qb.push(" ORDER BY COALESCE(salary_min, 0) ASC, created_at DESC");
        }
        (SortOrder::Relevance, Some(text)) => {
            qb.push(" ORDER BY ts_rank(").push(SEARCH_VECTOR).push(", ");
            push_tsquery(qb, text);
            qb.push(") DESC, created_at DESC");
        }
        (SortOrder::Newest, _) | (SortOrder::Relevance, None) => {
            qb.push(" ORDER BY created_at DESC");
        }
    }
}

// plainto_tsquery ANDs its lexemes, listing search ORs them
fn push_tsquery(qb: &mut QueryBuilder<'_, Postgres>, text: &str) {
    qb.push("replace(plainto_tsquery('english', ")
        .push_bind(text.to_string())
        .push(")::text, ' & ', ' | ')::tsquery");
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::{
        adaptors::jobs::spec::JobType,
        jobs::query::{JobFilter, build_query},
    };

    fn render(filter: &JobFilter, sort: SortOrder) -> String {
        let query = build_query(filter);
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM jobs");
        push_where(&mut qb, &query);
        push_order(&mut qb, &query, sort);
        qb.sql().to_string()
    }

    #[test]
    fn renders_base_predicate_only() {
        assert_eq!(
            render(&JobFilter::default(), SortOrder::Newest),
            "SELECT 1 FROM jobs WHERE TRUE AND is_active AND NOT is_draft ORDER BY created_at DESC"
        );
    }

    #[test]
    fn renders_all_filters_with_binds() {
        let sql = render(
            &JobFilter {
                search: Some("rust".into()),
                location: Some("pune".into()),
                job_type: Some(JobType::Contract),
                salary_min: Some(10.0),
                salary_max: Some(20.0),
            },
            SortOrder::Relevance,
        );
        assert!(sql.contains("@@ replace(plainto_tsquery('english', $1)::text, ' & ', ' | ')::tsquery"));
        assert!(sql.contains("location ILIKE $2"));
        assert!(sql.contains("job_type = $3"));
        assert!(sql.contains("(salary_min >= $4 OR salary_min IS NULL)"));
        assert!(sql.contains("(salary_max <= $5 OR salary_max IS NULL)"));
        assert!(sql.contains("ORDER BY ts_rank("));
        assert!(sql.ends_with(") DESC, created_at DESC"));
    }

    #[test]
    fn relevance_without_search_is_newest() {
        assert!(render(&JobFilter::default(), SortOrder::Relevance)
            .ends_with("ORDER BY created_at DESC"));
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
