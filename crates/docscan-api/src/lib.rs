//! Docscan API Library
//!
//! HTTP surface for document scanning: streaming upload decode, recognition and
//! application setup.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
