// Core entities
pub mod organization;
pub mod user;
pub mod membership;
pub mod invitation;
pub mod template;
pub mod session;

// Identity-provider session records (refresh tokens)
pub mod auth_session;

// Re-export commonly used types
pub use organization::{NewOrganization, Organization};
pub use user::{Profile, User};
pub use membership::{Membership, MembershipWithProfile, NewMembership};
pub use invitation::{Invitation, NewInvitation};
pub use template::{NewTemplate, Template};
pub use session::{NewSession, PublicSession, Session, SessionStatus, SessionWithTemplate};
pub use auth_session::{AuthSession, NewAuthSession};
