// src/services/mod.rs

//! Domain logic shared by the HTTP handlers.
//! Every function takes the pool it should use; nothing here holds state.

pub mod analytics;
pub mod catalog;
pub mod scoring;

#[cfg(test)]
pub(crate) mod test_support;
