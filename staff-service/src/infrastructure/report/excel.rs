use rust_xlsxwriter::{Format, Workbook, XlsxError};
use shared::types::StaffRecord;

use crate::{
    config::ReportSettings,
    domain::report::{REPORT_HEADERS, ReportRenderer, report_row},
    error::StaffServiceError,
};

/// Writes staff reports as a single-sheet `.xlsx` workbook.
///
/// Every cell is stored as text so birthdays keep their `YYYY-MM-DD` form
/// instead of becoming Excel serial dates.
pub struct ExcelReportRenderer {
    sheet_name: String,
}

impl ExcelReportRenderer {
    pub fn new(settings: &ReportSettings) -> Self {
        Self {
            sheet_name: settings.sheet_name.clone(),
        }
    }

    fn build(&self, staff: &[StaffRecord]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, caption) in (0u16..).zip(REPORT_HEADERS) {
            worksheet.write_string_with_format(0, col, caption, &header)?;
        }

        for (row, record) in (1u32..).zip(staff) {
            for (col, cell) in (0u16..).zip(report_row(record)) {
                worksheet.write_string(row, col, cell)?;
            }
        }

        worksheet.autofit();
        workbook.save_to_buffer()
    }
}

impl ReportRenderer for ExcelReportRenderer {
    #[tracing::instrument(skip_all, fields(rows = staff.len()))]
    fn render(&self, staff: &[StaffRecord]) -> Result<Vec<u8>, StaffServiceError> {
        self.build(staff)
            .map_err(|e| StaffServiceError::Report(format!("spreadsheet: {e}")))
    }
}
