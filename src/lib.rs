pub mod cache;
pub mod cli;
pub mod environment;
pub mod error;
pub mod sources;
pub mod types;
pub mod utils;
pub mod web;

pub use cache::{JobBatch, JobCache};
pub use error::{FetchError, JobsError};
pub use sources::JobSource;
pub use types::{JobListing, JobQuery};
pub use web::start_web_server;
