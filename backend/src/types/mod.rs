pub mod environment;
pub mod error;
pub mod extractors;

pub use environment::Environment;
pub use error::{AppError, ErrorResponse};
pub use extractors::ValidatedJson;
