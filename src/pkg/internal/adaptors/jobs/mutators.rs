use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use super::selectors::COLUMNS;
use crate::pkg::internal::{
    adaptors::jobs::spec::JobEntry,
    jobs::{error::Result, input::JobPatch},
};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: &JobEntry) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING {cols}
            "#,
            cols = COLUMNS
        ))
        .bind(job.id)
        .bind(&job.job_title)
        .bind(&job.company_name)
        .bind(&job.company_logo)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(&job.experience)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary)
        .bind(job.application_deadline)
        .bind(&job.job_description)
        .bind(&job.description)
        .bind(job.is_draft)
        .bind(job.is_active)
        .bind(job.posted_by)
        .bind(Json(&job.applicants))
        .bind(job.views)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JobEntry>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET updated_at = ");
        qb.push_bind(now);

        macro_rules! set {
            ($($field:ident),*) => {
                $(
                    if let Some(value) = patch.$field {
                        qb.push(concat!(", ", stringify!($field), " = ")).push_bind(value);
                    }
                )*
            };
        }
        set!(
            job_title,
            company_name,
            company_logo,
            location,
            job_type,
            experience,
            salary_min,
            salary_max,
            salary,
            application_deadline,
            job_description,
            description,
            is_draft,
            is_active,
            posted_by
        );
        if let Some(applicants) = patch.applicants {
            qb.push(", applicants = ").push_bind(Json(applicants));
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(COLUMNS);
        let row = qb
            .build_query_as::<JobEntry>()
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM jobs")
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn increment_views(&mut self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE jobs SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
