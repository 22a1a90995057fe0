pub mod mac;
pub mod target;
