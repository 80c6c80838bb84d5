pub mod import;
pub mod round;
