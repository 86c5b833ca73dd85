//! # sparkclean-ai
//!
//! Task suggestion generation: the Gemini-backed `Suggester` implementation,
//! prompt construction, response parsing, and the static per-language
//! fallback lists used when the model call fails.

pub mod fallback;
pub mod gemini;
mod parse;
mod prompt;

pub use gemini::GeminiSuggester;
