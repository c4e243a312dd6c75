//! # Social-Mesh Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/query_bus.rs   # ask() round-trip latency and fan-out
//! └── src/integration/
//!     ├── query_bus.rs       # correlation, bounded waits, containment, leaks
//!     ├── flows.rs           # users / social / activities / notifications end to end
//!     └── resilience.rs      # modules degrading when a peer is missing
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p social-tests
//! cargo test -p social-tests integration::flows
//! cargo bench -p social-tests
//! ```

pub mod integration;
