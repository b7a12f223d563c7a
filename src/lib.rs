pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod input;
pub mod password;
pub mod surface;
pub mod vault;
