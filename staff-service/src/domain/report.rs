use shared::types::{GENDER_MALE, StaffRecord};

use crate::error::StaffServiceError;

/// Column captions, in output order.
pub const REPORT_HEADERS: [&str; 4] = ["Staff ID", "Full Name", "Birthday", "Gender"];

/// Base name used for downloaded report files.
const REPORT_FILE_STEM: &str = "staff-report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Office Open XML workbook (`.xlsx`)
    Spreadsheet,
    /// PDF document
    Document,
}

impl ReportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Document => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Document => "pdf",
        }
    }

    pub fn file_name(self) -> String {
        format!("{REPORT_FILE_STEM}.{}", self.extension())
    }
}

/// Turns an ordered list of staff into a downloadable table artifact.
///
/// Implementations write [`REPORT_HEADERS`] followed by one row per record in
/// input order, and must still produce a valid file for an empty list.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
pub trait ReportRenderer: Send + Sync {
    fn render(&self, staff: &[StaffRecord]) -> Result<Vec<u8>, StaffServiceError>;
}

/// Bytes of a rendered report together with the format that produced them.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

/// Display label for a stored gender code.
///
/// Only `1` is "Male"; every other value, including codes outside {1, 2},
/// renders as "Female". Existing reports depend on this, so unknown codes are
/// not given a label of their own.
pub fn gender_label(code: i32) -> &'static str {
    if code == GENDER_MALE { "Male" } else { "Female" }
}

/// Cell texts for one record, aligned with [`REPORT_HEADERS`].
pub fn report_row(staff: &StaffRecord) -> [String; 4] {
    [
        staff.staff_id.clone(),
        staff.full_name.clone(),
        staff.birthday.format("%Y-%m-%d").to_string(),
        gender_label(staff.gender).to_string(),
    ]
}
