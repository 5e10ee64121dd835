pub mod report;
pub mod script;
pub mod session;
