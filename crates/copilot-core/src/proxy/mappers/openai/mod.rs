// OpenAI mapper module
// Rewrites upstream reply lines into OpenAI response shapes

pub mod transcoder;

pub use transcoder::{transcode, transcode_line, TranscodeKind, TranscodeOptions};
