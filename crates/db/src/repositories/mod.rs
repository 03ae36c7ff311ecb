//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument. Queries share explicit
//! column lists and return row models; domain decoding happens in the
//! store adapters and handlers.

pub mod sample_repo;
pub mod session_repo;
pub mod task_repo;

pub use sample_repo::SampleRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
