//! Streaming HTML5 tokenization core.
//!
//! The pipeline is `chunk -> preprocessor -> code points -> tokenizer state
//! machine -> token sink`; `Html5StreamSession` drives it incrementally and
//! coordinates document.write-style script suspension.

#[cfg(feature = "html5")]
pub mod html5;
