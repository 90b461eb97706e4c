//! `citedate-core`: Core types shared by the engine, IO, and CLI crates.
//!
//! A [`Table`] is an ordered, rectangular set of string cells under a header
//! row. Row order is significant and never changed by any operation here.

pub mod table;

pub use table::Table;
