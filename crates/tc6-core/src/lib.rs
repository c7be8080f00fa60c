//! TC6 Core Types
//!
//! This crate provides the canonical model produced by extracting a PLCopen
//! TC6 (CODESYS) configuration export. It includes:
//!
//! - **Kinds**: Type kinds, collections and locator strategies ([`kind`] module)
//! - **Records**: Immutable records for types, variables and program units ([`record`] module)
//! - **Collections**: Name-keyed, first-write-wins sets ([`collection::NamedCollection`])
//! - **Model**: The canonical model and its builder ([`model`] module)
//! - **Resolution**: Type references and circular composites ([`resolve`] module)

pub mod collection;
pub mod kind;
pub mod model;
pub mod record;
pub mod resolve;
