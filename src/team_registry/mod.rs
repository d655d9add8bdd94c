//! Team identity resolution
//!
//! Collapses the many spellings, abbreviations and diacritic variants a
//! provider feed uses for one club into a single canonical display name.
//! The alias and crest tables are immutable data loaded once at startup;
//! the resolver layers lookup strategies on top of them in strict priority
//! order.

pub mod aliases;
pub mod normalizer;
pub mod resolver;

pub use normalizer::normalize;
pub use resolver::TeamRegistry;
