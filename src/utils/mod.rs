pub mod clock;
pub mod duration;
pub mod jwt;
pub mod password;
pub mod validation;
