mod config;
mod error;
mod naming;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use config::StorageConfig;
pub use error::StorageError;
pub use naming::object_name;
pub use traits::{BoxReader, ObjectUploader, within_deadline};
