//! # Domain Layer
//!
//! Pure verification logic with no I/O:
//! - `signature`: HMAC validation with constant-time comparison
//! - `replay`: monotonic counter parsing and acceptance rule
//! - `link`: chip-to-artwork agreement classification
//! - `entities`: request/verdict types crossing the inbound port
//! - `errors`: the verification error taxonomy

pub mod entities;
pub mod errors;
pub mod link;
pub mod replay;
pub mod signature;
