//! Wire protocol
//!
//! Uses `maybe_async` to support both sync and async modes:
//! - With `is_sync` feature: blocking/synchronous
//! - Without `is_sync` feature: async

mod framer;

pub use framer::{execute, MAX_HEADER_LEN};
