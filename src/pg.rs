//! Postgres-backed student store. Documents live in a single `jsonb`
//! column; `seq` preserves insertion order across updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::err::Error;
use crate::models::{DeleteResult, Student, StudentFields, StudentPatch};
use crate::store::{Field, Filter, StudentStore};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS students (
    seq        bigserial,
    id         uuid PRIMARY KEY,
    doc        jsonb NOT NULL,
    created_at timestamptz NOT NULL,
    updated_at timestamptz NOT NULL
)";

#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    /// Connects to the database and makes sure the collection table exists.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = PgPool::connect(url).await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    doc: Json<StudentFields>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: row.id,
            fields: row.doc.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Renders a filter as a SQL condition over the `students` table.
/// [`Filter::IdIs`] renders as a `$1` placeholder for the caller to bind.
fn condition_sql(filter: &Filter) -> String {
    match filter {
        Filter::All => "true".to_string(),
        Filter::IdIs(_) => "id = $1".to_string(),
        Filter::AnyEmpty(fields) => {
            if fields.is_empty() {
                return "false".to_string();
            }
            let terms: Vec<String> = fields.iter().map(|field| empty_sql(*field)).collect();
            format!("({})", terms.join(" OR "))
        }
    }
}

// `->>` yields SQL NULL for both a JSON null and a missing key.
fn empty_sql(field: Field) -> String {
    if field.is_string() {
        format!(
            "(doc->>'{key}' IS NULL OR doc->>'{key}' = '')",
            key = field.key()
        )
    } else {
        format!("doc->>'{}' IS NULL", field.key())
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find(&self, filter: &Filter) -> Result<Vec<Student>, Error> {
        let rows = match filter {
            Filter::IdIs(id) => {
                sqlx::query_as::<_, StudentRow>(
                    "SELECT id, doc, created_at, updated_at FROM students \
                     WHERE id = $1 ORDER BY seq",
                )
                .bind(*id)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                let sql = format!(
                    "SELECT id, doc, created_at, updated_at FROM students \
                     WHERE {} ORDER BY seq",
                    condition_sql(filter)
                );
                sqlx::query_as::<_, StudentRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn insert_one(&self, fields: StudentFields) -> Result<Student, Error> {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO students (id, doc, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(student.id)
        .bind(Json(&student.fields))
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(student)
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, Error> {
        // `doc || $patch` merges the patch in: absent keys stay untouched,
        // null values overwrite to null.
        let now = Utc::now();
        let row = match filter {
            Filter::IdIs(id) => {
                sqlx::query_as::<_, StudentRow>(
                    "UPDATE students SET doc = doc || $2, updated_at = $3 WHERE id = $1 \
                     RETURNING id, doc, created_at, updated_at",
                )
                .bind(*id)
                .bind(Json(patch))
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            _ => {
                let sql = format!(
                    "UPDATE students SET doc = doc || $1, updated_at = $2 \
                     WHERE ctid IN (SELECT ctid FROM students WHERE {} ORDER BY seq LIMIT 1) \
                     RETURNING id, doc, created_at, updated_at",
                    condition_sql(filter)
                );
                sqlx::query_as::<_, StudentRow>(&sql)
                    .bind(Json(patch))
                    .bind(now)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.map(Student::from))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, Error> {
        let done = match filter {
            Filter::IdIs(id) => {
                sqlx::query(
                    "DELETE FROM students WHERE ctid IN \
                     (SELECT ctid FROM students WHERE id = $1 ORDER BY seq LIMIT 1)",
                )
                .bind(*id)
                .execute(&self.pool)
                .await?
            }
            _ => {
                let sql = format!(
                    "DELETE FROM students WHERE ctid IN \
                     (SELECT ctid FROM students WHERE {} ORDER BY seq LIMIT 1)",
                    condition_sql(filter)
                );
                sqlx::query(&sql).execute(&self.pool).await?
            }
        };
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: done.rows_affected(),
        })
    }

    async fn delete_many(&self, filter: &Filter) -> Result<DeleteResult, Error> {
        let done = match filter {
            Filter::IdIs(id) => {
                sqlx::query("DELETE FROM students WHERE id = $1")
                    .bind(*id)
                    .execute(&self.pool)
                    .await?
            }
            _ => {
                let sql = format!("DELETE FROM students WHERE {}", condition_sql(filter));
                sqlx::query(&sql).execute(&self.pool).await?
            }
        };
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: done.rows_affected(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_document_renders_as_true() {
        assert_eq!(condition_sql(&Filter::All), "true");
    }

    #[test]
    fn id_filters_render_as_a_placeholder() {
        assert_eq!(condition_sql(&Filter::IdIs(Uuid::new_v4())), "id = $1");
    }

    #[test]
    fn empty_field_checks_treat_null_and_missing_alike() {
        assert_eq!(
            condition_sql(&Filter::AnyEmpty(vec![Field::Name, Field::Mark])),
            "((doc->>'name' IS NULL OR doc->>'name' = '') OR doc->>'mark' IS NULL)"
        );
    }

    #[test]
    fn string_fields_also_count_blank_values() {
        assert_eq!(
            empty_sql(Field::Photo),
            "(doc->>'photo' IS NULL OR doc->>'photo' = '')"
        );
        assert_eq!(empty_sql(Field::IsDonePr), "doc->>'isDonePr' IS NULL");
    }

    #[test]
    fn an_empty_field_list_matches_nothing() {
        assert_eq!(condition_sql(&Filter::AnyEmpty(Vec::new())), "false");
    }
}
