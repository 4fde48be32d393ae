//! Narrative commentary providers.
//!
//! Commentary is best-effort enrichment: every failure path ends in the
//! marked fallback text and never touches the numeric result.

mod fallback;
mod gemini;
mod template;

pub use fallback::{attach_narratives, narrate, UnavailableNarrator};
pub use gemini::{GeminiConfig, GeminiNarrator};
pub use template::TemplateNarrator;
