//! Rate-limited client for the goods-marking "create document" API.
//!
//! [`RateGate`] admits at most N calls per fixed window and resets to full on
//! every window boundary. [`SubmissionClient`] takes one permit per document,
//! serializes it to JSON and posts it with the caller's signature.

pub mod analytics;
pub mod config;
pub mod document;
pub mod error;
pub mod http;

pub use config::{ClientConfig, HttpConfig, TimeUnit};
pub use document::{Description, Document, Product};
pub use error::{Result, SubmitError};
pub use http::rate_limiter::{GateState, RateGate};
pub use http::submission_client::SubmissionClient;
pub use http::transport::{HttpTransport, OutboundRequest, ReqwestTransport, SubmissionOutcome};
