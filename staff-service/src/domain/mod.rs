pub mod report;
pub mod search;
pub mod service;
pub mod staff;
