pub mod adaptors;
pub mod jobs;
