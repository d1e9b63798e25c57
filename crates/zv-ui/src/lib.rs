//! Terminal UI for the zv CLI.

pub mod output;
pub mod progress;
pub mod style;

pub use output::{Output, Verbosity};
pub use progress::{Progress, Spinner};
pub use style::Style;
