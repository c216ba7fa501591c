pub mod pool;
pub mod rate_limiter;
pub mod submission_client;
pub mod transport;
