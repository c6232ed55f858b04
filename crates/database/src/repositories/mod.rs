pub mod auth_sessions;
pub mod invitations;
pub mod memberships;
pub mod organizations;
pub mod sessions;
pub mod templates;
pub mod users;
