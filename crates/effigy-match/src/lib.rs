//! Argument pattern matching.
//!
//! This crate decides whether an observed argument value satisfies an
//! expected pattern. It is the leaf of the Effigy workspace: the call
//! query layer filters recorded argument tuples through these patterns,
//! and nothing here knows about contracts or doubles.

pub mod pattern;

pub use pattern::{ANYTHING, Pattern, Predicate, matches, matches_all};
