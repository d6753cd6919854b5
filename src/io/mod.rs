//! I/O primitives for metadata parsing
//!
//! This module provides the seekable reader abstraction, the bounded window
//! stream that metadata is read from, and byte order handling.

pub mod seekable;
pub mod byte_order;
pub mod bounded;
