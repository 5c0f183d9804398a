// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the translator
// works with: token sequences, sentence pairs, vocabularies,
// attention windows and the sinks that consume training events.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Source/target token id sequences
pub mod sentence_pair;

// Bidirectional word <-> id mapping per language
pub mod vocabulary;

// Window bounds and the full-length attention matrix
pub mod attention;

// Typed configuration and data errors
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
