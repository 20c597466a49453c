pub mod draft;
pub mod generator;
pub mod prompt;

pub use draft::postprocess;
pub use generator::{BlogGenerator, GenerationOptions};
pub use prompt::build_prompt;
