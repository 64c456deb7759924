//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod match_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod requirement_repo;
pub mod tutor_repo;

pub use match_repo::MatchRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use requirement_repo::RequirementRepo;
pub use tutor_repo::TutorRepo;
