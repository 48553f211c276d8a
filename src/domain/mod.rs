pub mod error;
pub mod model;
pub mod platform;

pub use error::AppError;
pub use model::{JobState, ProgressSnapshot, VersionCatalog};
pub use platform::Platform;
