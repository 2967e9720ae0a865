pub mod error;
pub mod format;
pub mod output;
pub mod tags;
pub mod template;

pub use error::{handle_flow, report_error, AppError, AppResult, FlowResult};
pub use output::{print_success, print_warning, DisplayFormatter, OutputStyle};
