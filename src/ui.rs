pub use crate::features::ui::run_ui;
