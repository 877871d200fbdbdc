// src/core/mod.rs

pub mod memo;
pub mod net;
pub mod sanitize;

pub use memo::Memo;
pub use net::{HttpClient, Request, Response, Transport};
