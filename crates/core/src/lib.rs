//! Domain logic for the staging pipeline: intake validation, image
//! compression, prompt construction, variant identifiers, and
//! download naming. Everything here is synchronous and free of I/O
//! beyond in-memory image codecs.

pub mod compression;
pub mod error;
pub mod intake;
pub mod naming;
pub mod prompt;
pub mod types;
pub mod variant;
