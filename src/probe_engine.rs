pub use crate::features::probe::engine::{Transfer, TransferClient};
pub use crate::features::probe::{CurlProbe, ScriptedProbe};
