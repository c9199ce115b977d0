//! Data models for the token service

pub mod token;
pub use token::*;
