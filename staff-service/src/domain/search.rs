use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use shared::types::StaffRecord;
use utoipa::{IntoParams, ToSchema};

use crate::domain::staff::is_storable_date;

/// Optional filters for staff search and report export.
///
/// Every present field narrows the result (logical AND); absent fields impose
/// no constraint. Substring matches are case-sensitive. Empty strings coming
/// from cleared form inputs are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct SearchCriteria {
    /// Substring of the staff id
    #[serde(deserialize_with = "blank_as_none")]
    pub staff_id: Option<String>,
    /// Substring of the full name
    #[serde(deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    /// Exact gender code
    #[serde(deserialize_with = "loose_gender")]
    pub gender: Option<i32>,
    /// Inclusive lower bound on birthday
    #[serde(deserialize_with = "loose_date")]
    #[param(value_type = Option<String>, format = Date)]
    #[schema(value_type = Option<String>, format = Date)]
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on birthday
    #[serde(deserialize_with = "loose_date")]
    #[param(value_type = Option<String>, format = Date)]
    #[schema(value_type = Option<String>, format = Date)]
    pub to_date: Option<NaiveDate>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.staff_id.is_none()
            && self.name.is_none()
            && self.gender.is_none()
            && self.from_date.is_none()
            && self.to_date.is_none()
    }

    /// Evaluates the conjunction of all present filters against one record.
    pub fn matches(&self, staff: &StaffRecord) -> bool {
        if let Some(staff_id) = &self.staff_id
            && !staff.staff_id.contains(staff_id.as_str())
        {
            return false;
        }
        if let Some(name) = &self.name
            && !staff.full_name.contains(name.as_str())
        {
            return false;
        }
        if let Some(gender) = self.gender
            && staff.gender != gender
        {
            return false;
        }
        if let Some(from) = self.from_date
            && staff.birthday < from
        {
            return false;
        }
        if let Some(to) = self.to_date
            && staff.birthday > to
        {
            return false;
        }
        true
    }

    /// Keeps the records that satisfy [`SearchCriteria::matches`], preserving order.
    pub fn filter<'a, I>(&self, staff: I) -> Vec<StaffRecord>
    where
        I: IntoIterator<Item = &'a StaffRecord>,
    {
        staff
            .into_iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

// Query strings deliver every value as text while JSON bodies send numbers,
// so the gender field has to accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

fn loose_gender<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("gender out of range: {n}"))),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i32>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid gender: {text}")))
        }
    }
}

fn loose_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|e| serde::de::Error::custom(format!("invalid date {value:?}: {e}")))?;
            if !is_storable_date(&date) {
                return Err(serde::de::Error::custom(format!(
                    "date {value:?} is outside years 0001-9999"
                )));
            }
            Ok(Some(date))
        }
    }
}
