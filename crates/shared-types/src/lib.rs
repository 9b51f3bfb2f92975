//! # Shared Types Crate
//!
//! This crate contains the domain entities shared across the verification
//! service: chips, chip-artwork links, and the append-only scan event
//! audit record.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Identifiers**: `ChipId`, `TagId`, and `ArtworkId` are newtypes;
//!   callers never manipulate raw strings or UUIDs directly.
//! - **Secrets Stay Private**: `ChipSecret` redacts itself from `Debug`
//!   output and is never serialized toward callers.

pub mod entities;

pub use entities::*;
