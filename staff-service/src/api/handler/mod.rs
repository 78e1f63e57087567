pub mod report;
pub mod staff;
