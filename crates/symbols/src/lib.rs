//! # Symbols
//!
//! Lightweight structural analysis of JavaScript and TypeScript sources:
//! which hooks a file calls, which components it defines and renders, which
//! plain functions it declares, and condensed outlines of its declarations.
//!
//! All extractors are total. Input that cannot be parsed produces a result
//! carrying an error message instead of panicking.
//!
//! ```
//! use symbols::extract_symbols;
//!
//! let digest = extract_symbols("const Foo = () => <div/>;", "Foo.tsx");
//! assert_eq!(digest.defined_components, vec!["Foo"]);
//! assert_eq!(digest.used_components, vec!["div"]);
//! ```

mod analyzer;
mod digest;
mod extract;
mod outline;
mod syntax;

pub use analyzer::{
    is_supported, Analysis, AnalysisMode, AnalyzerOptions, FileAnalyzer, DEFAULT_MAX_FILE_BYTES,
    SUPPORTED_EXTENSIONS,
};
pub use digest::SymbolDigest;
pub use extract::extract_symbols;
pub use outline::{extract_signatures, extract_skeleton, Outline};
