use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use shared::types::{GENDER_FEMALE, GENDER_MALE, StaffRecord};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{domain::search::SearchCriteria, error::StaffServiceError};

/// Request body accepted by the create and update endpoints.
///
/// Field bounds mirror the column constraints of the `staff` table so bad
/// input is rejected before it reaches the database.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    #[validate(length(min = 1, max = 8, message = "staffId must be between 1 and 8 characters"))]
    #[schema(max_length = 8, example = "S0001")]
    pub staff_id: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "fullName must be between 1 and 100 characters"
    ))]
    #[schema(max_length = 100, example = "Jane Doe")]
    pub full_name: String,
    #[validate(custom(function = "validate_birthday"))]
    #[schema(example = "1990-01-01")]
    pub birthday: NaiveDate,
    #[validate(range(
        min = GENDER_MALE,
        max = GENDER_FEMALE,
        message = "gender must be 1 (Male) or 2 (Female)"
    ))]
    #[schema(minimum = 1, maximum = 2, example = 1)]
    pub gender: i32,
}

/// Birthdays are stored as `YYYY-MM-DD` text and range-filtered by string
/// comparison, which only orders correctly for four-digit years.
pub fn is_storable_date(date: &NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

fn validate_birthday(birthday: &NaiveDate) -> Result<(), ValidationError> {
    if is_storable_date(birthday) {
        Ok(())
    } else {
        Err(ValidationError::new("birthday_range")
            .with_message("birthday year must be between 0001 and 9999".into()))
    }
}

impl From<StaffInput> for StaffRecord {
    fn from(input: StaffInput) -> Self {
        Self {
            staff_id: input.staff_id,
            full_name: input.full_name,
            birthday: input.birthday,
            gender: input.gender,
        }
    }
}

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<StaffRecord>, StaffServiceError>;
    async fn find_by_id(&self, staff_id: &str) -> Result<Option<StaffRecord>, StaffServiceError>;
    /// Fails with [`StaffServiceError::Conflict`] when the id is already taken.
    async fn insert(&self, staff: StaffRecord) -> Result<StaffRecord, StaffServiceError>;
    /// Fails with [`StaffServiceError::NotFound`] when no row has `staff_id`.
    async fn update(
        &self,
        staff_id: &str,
        staff: StaffRecord,
    ) -> Result<StaffRecord, StaffServiceError>;
    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, staff_id: &str) -> Result<bool, StaffServiceError>;
    async fn search(&self, criteria: &SearchCriteria)
    -> Result<Vec<StaffRecord>, StaffServiceError>;
}
