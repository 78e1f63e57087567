pub mod excel;
pub mod pdf;

pub use excel::ExcelReportRenderer;
pub use pdf::PdfReportRenderer;
