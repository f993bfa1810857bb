//! Thin HTTP surface: one chat endpoint, one health endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse};
pub use routes::router;
