//! # EstateChain Test Suite
//!
//! Unified test crate covering what no single crate can test alone:
//!
//! ```text
//! tests/src/
//! ├── integration/
//! │   ├── escrow_flows.rs   # full deal lifecycles across every component
//! │   └── persistence.rs    # RocksDB stores across close/reopen
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p estatechain-tests
//! cargo test -p estatechain-tests integration::escrow_flows::
//! ```

#![allow(dead_code)]

pub mod integration;
