//! Core entity handles and error types for Mosaic.
//!
//! This crate provides:
//! - [`Entity`] - Generational entity handles
//! - [`Error`] - The error taxonomy shared by all storage operations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;

pub use entity::Entity;
pub use error::{Error, ErrorKind, Result};
