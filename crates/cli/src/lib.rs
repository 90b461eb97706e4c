//! Library half of the `citedate` CLI, exposed so tests can drive the
//! report renderers directly.

pub mod report;
