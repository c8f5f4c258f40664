pub use crate::features::app::{AppState, ProbeSource};
