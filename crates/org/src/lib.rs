pub mod bootstrap;
pub mod error;
pub mod invitations;
pub mod members;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{BootstrapOutcome, BootstrapRequest, OrganizationService};
pub use error::{OrgError, Result};
pub use invitations::{AcceptOutcome, InvitationService, InviteRequest, IssuedInvitation};
pub use members::{is_valid_role, MemberService};
pub use resolver::OrgResolver;
