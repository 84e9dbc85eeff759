//! Fuzzing library for arxiv-vault.
//!
//! Targets cover everything that parses untrusted text: user-pasted URLs,
//! registry Atom feeds, and summarization service envelopes.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_atom_feed -- -max_total_time=60
//! ```

pub use arxiv_vault::{client::parse_feed, identifier, models, summarizer};
