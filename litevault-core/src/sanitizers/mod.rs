//! Rule compilation for the regex redaction pipeline.
//!
//! Turns `RedactionRule` definitions into compiled, ordered regular
//! expressions and caches them per configuration. `engines::regex_engine`
//! applies the result.

pub mod compiler;
