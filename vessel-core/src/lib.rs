#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Core domain types and port definitions for the vessel tracking engine.

mod domain;
mod error;
mod ports;
mod retry;

pub use domain::*;
pub use error::*;
pub use ports::*;
pub use retry::*;
