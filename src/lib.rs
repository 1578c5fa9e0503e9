//! Core library for the hikextract CLI.
//!
//! Index decoding lives in the `hikextract-index` crate; this crate
//! adds the extraction engine, output naming, and run reporting on top
//! of it.

pub mod extract;
pub mod naming;
pub mod report;
