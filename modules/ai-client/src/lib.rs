pub mod error;
pub mod gemini;
pub mod util;

pub use error::AiError;
pub use gemini::{Gemini, StructuredOutput, DEFAULT_GEMINI_MODEL};
pub use util::strip_code_blocks;
