use async_trait::async_trait;
use chrono::NaiveDate;
use shared::types::StaffRecord;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    domain::{search::SearchCriteria, staff::StaffRepository},
    error::StaffServiceError,
};

const SELECT_STAFF: &str = "SELECT staff_id, full_name, birthday, gender FROM staff";

/// Row shape of the `staff` table.
#[derive(Debug, FromRow)]
struct StaffRow {
    staff_id: String,
    full_name: String,
    birthday: NaiveDate,
    gender: i32,
}

impl From<StaffRow> for StaffRecord {
    fn from(row: StaffRow) -> Self {
        Self {
            staff_id: row.staff_id,
            full_name: row.full_name,
            birthday: row.birthday,
            gender: row.gender,
        }
    }
}

pub struct SqliteStaffRepository {
    pool: SqlitePool,
}

impl SqliteStaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Appends the conjunction of every present filter to `query`.
///
/// `instr` keeps substring matching case-sensitive, unlike SQLite's `LIKE`.
fn push_criteria(query: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    if criteria.is_empty() {
        return;
    }

    query.push(" WHERE ");
    let mut clauses = query.separated(" AND ");

    if let Some(staff_id) = &criteria.staff_id {
        clauses
            .push("instr(staff_id, ")
            .push_bind_unseparated(staff_id.clone())
            .push_unseparated(") > 0");
    }
    if let Some(name) = &criteria.name {
        clauses
            .push("instr(full_name, ")
            .push_bind_unseparated(name.clone())
            .push_unseparated(") > 0");
    }
    if let Some(gender) = criteria.gender {
        clauses.push("gender = ").push_bind_unseparated(gender);
    }
    if let Some(from) = criteria.from_date {
        clauses.push("birthday >= ").push_bind_unseparated(from);
    }
    if let Some(to) = criteria.to_date {
        clauses.push("birthday <= ").push_bind_unseparated(to);
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl StaffRepository for SqliteStaffRepository {
    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<StaffRecord>, StaffServiceError> {
        let output = sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        Ok(output.into_iter().map(StaffRecord::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, staff_id: &str) -> Result<Option<StaffRecord>, StaffServiceError> {
        let output = sqlx::query_as::<_, StaffRow>(&format!("{SELECT_STAFF} WHERE staff_id = ?"))
            .bind(staff_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(output.map(StaffRecord::from))
    }

    #[tracing::instrument(skip(self))]
    async fn insert(&self, staff: StaffRecord) -> Result<StaffRecord, StaffServiceError> {
        let output = sqlx::query_as::<_, StaffRow>(
            r#"
            INSERT INTO staff (staff_id, full_name, birthday, gender)
            VALUES (?, ?, ?, ?)
            RETURNING staff_id, full_name, birthday, gender
            "#,
        )
        .bind(&staff.staff_id)
        .bind(&staff.full_name)
        .bind(staff.birthday)
        .bind(staff.gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StaffServiceError::Conflict("Staff ID already exists.".to_string())
            } else {
                StaffServiceError::Database(e)
            }
        })?;

        Ok(output.into())
    }

    #[tracing::instrument(skip(self))]
    async fn update(
        &self,
        staff_id: &str,
        staff: StaffRecord,
    ) -> Result<StaffRecord, StaffServiceError> {
        let output = sqlx::query_as::<_, StaffRow>(
            r#"
            UPDATE staff
            SET full_name = ?,
                birthday = ?,
                gender = ?
            WHERE staff_id = ?
            RETURNING staff_id, full_name, birthday, gender
            "#,
        )
        .bind(&staff.full_name)
        .bind(staff.birthday)
        .bind(staff.gender)
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        output
            .map(StaffRecord::from)
            .ok_or_else(|| StaffServiceError::NotFound("Staff not found".to_string()))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, staff_id: &str) -> Result<bool, StaffServiceError> {
        let output = sqlx::query(
            r#"
            DELETE FROM staff
            WHERE staff_id = ?
            "#,
        )
        .bind(staff_id)
        .execute(&self.pool)
        .await?;

        Ok(output.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<StaffRecord>, StaffServiceError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_STAFF);
        push_criteria(&mut query, criteria);
        query.push(" ORDER BY rowid");

        let output = query
            .build_query_as::<StaffRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(output.into_iter().map(StaffRecord::from).collect())
    }
}
