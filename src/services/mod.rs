pub mod access;
pub mod aggregation;
pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod records;
pub mod seed;
pub mod timer;
