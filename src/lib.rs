//! Rule engine for `.gitignore`-style files.
//!
//! An ignore file is treated as an ordered list of rules that can be added,
//! removed, reordered, rendered back to text and checked for rules that
//! repeat, contradict or shadow each other. A bounded autofixer removes the
//! superfluous ones.
pub mod builders;
pub mod core;

#[cfg(test)]
mod tests;
