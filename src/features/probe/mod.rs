pub mod engine;
mod scripted;
pub(crate) mod summary;

pub use engine::CurlProbe;
pub use scripted::ScriptedProbe;
