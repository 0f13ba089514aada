//! Search layer tests
//!
//! End-to-end question answering over an indexed collection.

mod test_failures;
mod test_fallback;
mod test_search;
