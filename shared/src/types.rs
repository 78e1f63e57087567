use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored gender code for male staff.
pub const GENDER_MALE: i32 = 1;
/// Stored gender code for female staff.
pub const GENDER_FEMALE: i32 = 2;

/// A single staff record as it travels over the wire.
///
/// `staff_id` is the primary key and never changes once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    #[schema(max_length = 8, example = "S0001")]
    pub staff_id: String,
    #[schema(max_length = 100, example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "1990-01-01")]
    pub birthday: NaiveDate,
    /// 1 = Male, 2 = Female
    #[schema(minimum = 1, maximum = 2, example = 1)]
    pub gender: i32,
}
