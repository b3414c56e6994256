pub mod user;
pub mod time_record;
pub mod stats;
