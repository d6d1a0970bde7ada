pub mod derive;
pub mod error;
pub mod input;
pub mod listing;
pub mod paginate;
pub mod query;

pub use error::{FieldError, JobError};
pub use listing::{JobPage, ListingConfig, ListingService};
