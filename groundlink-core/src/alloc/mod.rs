//! ## groundlink-core::alloc
//! **Fixed-capacity read buffer pool**
//!
//! ### Key Submodules:
//! - `pool`: free-list of equally sized byte buffers with RAII checkout
//! - `stats`: checkout/return counters for the pool

pub mod pool;
pub mod stats;

pub use pool::{BufferPool, PooledBuffer, BUFFER_SIZE_WARNING_LIMIT};
pub use stats::PoolStats;
