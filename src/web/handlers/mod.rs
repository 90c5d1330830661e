pub mod jobs_handlers;
pub mod system_handlers;

pub use jobs_handlers::*;
pub use system_handlers::*;
