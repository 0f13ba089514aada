//! Storage layer tests
//!
//! Collection persistence across reopen and isolation between
//! collections.

mod test_persistence;
