pub mod analyze;
pub mod pilot;
pub mod run;
pub mod validate;
