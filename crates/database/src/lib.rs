pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::{Database, DatabaseConfig};
pub use error::{DatabaseError, Result};
pub use repositories::{
    auth_sessions::AuthSessionRepository,
    invitations::InvitationRepository,
    memberships::MembershipRepository,
    organizations::OrganizationRepository,
    sessions::SessionRepository,
    templates::TemplateRepository,
    users::UserRepository,
};
