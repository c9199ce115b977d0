//! Route definitions

mod token;

pub use token::{app, token_routes};
