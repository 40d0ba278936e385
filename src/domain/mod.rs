// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing notebooks,
// cells and the collaborators the rest of the system needs.
//
// Rules for this layer:
//   - NO file I/O
//   - NO scoring logic (that lives in the scoring layer)
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A single code or markdown cell
pub mod cell;

// A notebook and the corpus-level OrderMap alias
pub mod notebook;

// Core abstractions (traits) that other layers implement
pub mod traits;
