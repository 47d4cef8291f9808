//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod contact_inquiry_repo;
pub mod inline_content_repo;
pub mod rate_limit_repo;
pub mod service_repo;
pub mod team_member_repo;

pub use contact_inquiry_repo::ContactInquiryRepo;
pub use inline_content_repo::InlineContentRepo;
pub use rate_limit_repo::RateLimitRepo;
pub use service_repo::ServiceRepo;
pub use team_member_repo::TeamMemberRepo;
