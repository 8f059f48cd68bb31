//! Data access for the job board tables.

mod companies;
mod jobs;

pub use companies::{Companies, Company, CompanyField};
pub use jobs::{Job, JobField, Jobs, NewJob};
