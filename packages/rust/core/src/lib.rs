//! Loading pipeline for kbload.
//!
//! This crate turns a delimited source file into KB mappings: line parsing
//! ([`entries`]), the persistence contract ([`store`]), and the load
//! workflow that ties them together ([`loader`]).

pub mod entries;
pub mod loader;
pub mod store;
