//! REST client module for the alerta backend.
//!
//! The backend issues opaque bearer tokens through its login endpoint;
//! every other call presents the token in an Authorization header.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiUser, DEFAULT_BASE_URL};
pub use error::ApiError;
