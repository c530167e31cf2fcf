//! PostgreSQL implementation of PatronRepository.
//!
//! Provides persistent storage for Patron aggregates using PostgreSQL.
//! Email uniqueness is enforced by the `patrons_email_key` constraint.

use crate::domain::foundation::{DomainError, ErrorCode, PatronId, Timestamp};
use crate::domain::patron::{Patron, PatronPrimitives};
use crate::domain::person::Email;
use crate::ports::{PatronFilter, PatronPage, PatronRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const EMAIL_CONSTRAINT: &str = "patrons_email_key";

/// Optional filters, each disabled when its parameter is NULL:
/// `$1` role, `$2` ILIKE pattern, `$3` active flag.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR role = $1)
      AND ($2::text IS NULL
           OR given_name ILIKE $2
           OR family_name ILIKE $2
           OR email ILIKE $2
           OR charge ILIKE $2)
      AND ($3::boolean IS NULL OR (ending_date >= NOW()) = $3)
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, given_name, family_name, role, charge,
           renovation_date, ending_date, created_at, updated_at
    FROM patrons
"#;

/// PostgreSQL implementation of the PatronRepository port.
pub struct PostgresPatronRepository {
    pool: PgPool,
}

impl PostgresPatronRepository {
    /// Creates a new PostgresPatronRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Applies the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))
}

/// Database row representation of a patron.
#[derive(Debug, sqlx::FromRow)]
struct PatronRow {
    id: String,
    email: String,
    given_name: String,
    family_name: String,
    role: String,
    charge: String,
    renovation_date: DateTime<Utc>,
    ending_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PatronRow> for Patron {
    type Error = DomainError;

    fn try_from(row: PatronRow) -> Result<Self, Self::Error> {
        let id = row.id.clone();
        Patron::from_primitives(PatronPrimitives {
            id: Some(row.id),
            email: row.email,
            given_name: row.given_name,
            family_name: row.family_name,
            role: row.role,
            charge: row.charge,
            renovation_date: Timestamp::from_datetime(row.renovation_date),
            ending_date: Timestamp::from_datetime(row.ending_date),
            created_at: Some(Timestamp::from_datetime(row.created_at)),
            updated_at: Some(Timestamp::from_datetime(row.updated_at)),
        })
        .map_err(|e| {
            DomainError::database(format!("Stored patron {} is invalid: {}", id, e))
        })
    }
}

/// Builds an ILIKE pattern matching `term` anywhere, with wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn write_error(action: &str, email: &Email, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(EMAIL_CONSTRAINT) {
            return DomainError::new(ErrorCode::PatronExists, "Email is already registered")
                .with_detail("email", email.as_str());
        }
    }
    DomainError::database(format!("Failed to {} patron: {}", action, e))
}

#[async_trait]
impl PatronRepository for PostgresPatronRepository {
    async fn find(&self, filter: &PatronFilter) -> Result<PatronPage, DomainError> {
        let role = filter.role.map(|r| r.as_str());
        let pattern = filter.search_term().map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM patrons {}", FILTER_CLAUSE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(role)
            .bind(pattern.as_deref())
            .bind(filter.active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count patrons: {}", e)))?;

        let page_sql = format!(
            "{} {} ORDER BY created_at ASC, id ASC LIMIT $4 OFFSET $5",
            SELECT_COLUMNS, FILTER_CLAUSE
        );
        let rows: Vec<PatronRow> = sqlx::query_as(&page_sql)
            .bind(role)
            .bind(pattern.as_deref())
            .bind(filter.active)
            .bind(i64::from(filter.limit))
            .bind(filter.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to list patrons: {}", e)))?;

        let items = rows
            .into_iter()
            .map(Patron::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PatronPage {
            items,
            total: total.max(0) as u64,
        })
    }

    async fn find_by_id(&self, id: &PatronId) -> Result<Option<Patron>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let row: Option<PatronRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find patron: {}", e)))?;

        row.map(Patron::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Patron>, DomainError> {
        let sql = format!("{} WHERE email = $1", SELECT_COLUMNS);
        let row: Option<PatronRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find patron: {}", e)))?;

        row.map(Patron::try_from).transpose()
    }

    async fn create(&self, patron: &Patron) -> Result<Patron, DomainError> {
        let id = patron.id().cloned().unwrap_or_else(PatronId::generate);
        let data = patron.to_primitives();

        let row: PatronRow = sqlx::query_as(
            r#"
            INSERT INTO patrons (
                id, email, given_name, family_name, role, charge,
                renovation_date, ending_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING id, email, given_name, family_name, role, charge,
                      renovation_date, ending_date, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(&data.email)
        .bind(&data.given_name)
        .bind(&data.family_name)
        .bind(&data.role)
        .bind(&data.charge)
        .bind(data.renovation_date.as_datetime())
        .bind(data.ending_date.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create", patron.email(), e))?;

        Patron::try_from(row)
    }

    async fn update(&self, id: &PatronId, patron: &Patron) -> Result<Option<Patron>, DomainError> {
        let data = patron.to_primitives();

        let row: Option<PatronRow> = sqlx::query_as(
            r#"
            UPDATE patrons SET
                email = $2,
                given_name = $3,
                family_name = $4,
                role = $5,
                charge = $6,
                renovation_date = $7,
                ending_date = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, given_name, family_name, role, charge,
                      renovation_date, ending_date, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(&data.email)
        .bind(&data.given_name)
        .bind(&data.family_name)
        .bind(&data.role)
        .bind(&data.charge)
        .bind(data.renovation_date.as_datetime())
        .bind(data.ending_date.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update", patron.email(), e))?;

        row.map(Patron::try_from).transpose()
    }

    async fn delete(&self, id: &PatronId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM patrons WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete patron: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
