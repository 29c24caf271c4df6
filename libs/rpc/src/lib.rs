//! Protobuf messages and tonic stubs for the product service.
//!
//! `src/generated` is produced by buf from `proto/`; regenerate rather than edit.

pub mod generated;

pub use generated::product;
