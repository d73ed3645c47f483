#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! HTTP client for the backend vessel service: tracked-vessel CRUD,
//! bounding-box queries and vessel notes.

mod client;
mod models;

pub use client::*;
