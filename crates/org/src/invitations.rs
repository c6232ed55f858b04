use crate::error::{OrgError, Result};
use crate::members::is_valid_role;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickethub_auth::{hash_token, AuthResponse, IdentityService, SignInRequest};
use tickethub_cache::{selected_org_key, Cache};
use tickethub_database::{
    Database, InvitationRepository, MembershipRepository, OrganizationRepository,
};
use tickethub_models::{Invitation, NewInvitation, NewMembership, Organization};
use uuid::Uuid;
use validator::Validate;

/// Invitations expire this long after issuance
const INVITATION_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email)]
    pub email: String,

    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct IssuedInvitation {
    pub invitation: Invitation,
    /// Shareable link embedding the raw token. Delivery is the caller's
    /// concern; the workflow never depends on it.
    pub accept_url: String,
}

/// Outcome of consuming an invitation. AlreadyMember is informational,
/// not an error: the invitation is consumed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AcceptOutcome {
    Joined { organization_id: Uuid },
    AlreadyMember { organization_id: Uuid },
}

impl AcceptOutcome {
    pub fn organization_id(&self) -> Uuid {
        match self {
            AcceptOutcome::Joined { organization_id }
            | AcceptOutcome::AlreadyMember { organization_id } => *organization_id,
        }
    }
}

pub struct InvitationService {
    identity: Arc<IdentityService>,
    invitation_repo: InvitationRepository,
    member_repo: MembershipRepository,
    org_repo: OrganizationRepository,
    cache: Cache,
    base_url: String,
}

impl InvitationService {
    pub fn new(db: Database, identity: Arc<IdentityService>, cache: Cache, base_url: String) -> Self {
        let pool = db.pool().clone();

        Self {
            identity,
            invitation_repo: InvitationRepository::new(pool.clone()),
            member_repo: MembershipRepository::new(pool.clone()),
            org_repo: OrganizationRepository::new(pool),
            cache,
            base_url,
        }
    }

    /// Generate an opaque invitation token
    fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let token_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        hex::encode(token_bytes)
    }

    /// Issue an invitation. Duplicate pending invitations for the same
    /// email are allowed.
    pub async fn create(
        &self,
        organization_id: Uuid,
        issued_by: Uuid,
        request: InviteRequest,
    ) -> Result<IssuedInvitation> {
        request.validate()?;

        if !is_valid_role(&request.role) {
            return Err(OrgError::InvalidRole(request.role));
        }

        if !self.member_repo.is_member(issued_by, organization_id).await? {
            return Err(OrgError::Forbidden(
                "Only members of the organisation can send invitations".to_string(),
            ));
        }

        let token = Self::generate_token();

        let new_invitation = NewInvitation {
            organization_id,
            email: request.email,
            role: request.role,
            token_hash: hash_token(&token),
            expires_at: Utc::now() + Duration::hours(INVITATION_TTL_HOURS),
        };

        let invitation = self.invitation_repo.create(&new_invitation).await?;

        tracing::info!(
            "Invitation created: id={}, organization={}, role={}",
            invitation.id,
            organization_id,
            invitation.role
        );

        Ok(IssuedInvitation {
            accept_url: acceptance_link(&self.base_url, &token),
            invitation,
        })
    }

    /// Look up a live invitation by raw token. Unknown and expired tokens
    /// are the same terminal state.
    pub async fn lookup(&self, token: &str) -> Result<Invitation> {
        self.invitation_repo
            .find_by_token_hash(&hash_token(token))
            .await?
            .ok_or(OrgError::InvitationNotFound)
    }

    /// Invitation plus its organisation, for the acceptance page
    pub async fn preview(&self, token: &str) -> Result<(Invitation, Organization)> {
        let invitation = self.lookup(token).await?;
        let organization = self.org_repo.find_by_id(invitation.organization_id).await?;
        Ok((invitation, organization))
    }

    /// Accept with an already-authenticated identity
    pub async fn accept_authenticated(&self, token: &str, user_id: Uuid) -> Result<AcceptOutcome> {
        let invitation = self.lookup(token).await?;
        self.consume(invitation, user_id).await
    }

    /// Accept by creating a new identity bound to the invitation's email.
    /// A sign-up failure leaves the invitation unconsumed.
    pub async fn accept_with_signup(
        &self,
        token: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AcceptOutcome> {
        let invitation = self.lookup(token).await?;

        let user = self.identity.sign_up(&invitation.email, password).await?;

        if let Err(e) = self.identity.mirror_profile(&user, full_name).await {
            tracing::warn!("Profile mirror failed for user {}: {}", user.id, e);
        }

        self.consume(invitation, user.id).await
    }

    /// Accept by signing in with an existing identity. The identity's email
    /// is not required to match the invitation's target email. A sign-in
    /// failure leaves the invitation unconsumed.
    pub async fn accept_with_signin(
        &self,
        token: &str,
        request: &SignInRequest,
    ) -> Result<(AcceptOutcome, AuthResponse)> {
        let invitation = self.lookup(token).await?;

        let auth = self.identity.sign_in_with_password(request).await?;
        let outcome = self.consume(invitation, auth.user.id).await?;

        Ok((outcome, auth))
    }

    /// Consume an invitation for an authenticated user: join unless already
    /// a member, then delete the invitation and point the user's selected
    /// organisation at it. A membership-insert failure returns before the
    /// deletion, so the invitation stays retryable and is never consumed
    /// more than once.
    async fn consume(&self, invitation: Invitation, user_id: Uuid) -> Result<AcceptOutcome> {
        let organization_id = invitation.organization_id;

        let outcome = if self
            .member_repo
            .get(user_id, organization_id)
            .await?
            .is_some()
        {
            tracing::info!(
                "User {} is already a member of organisation {}",
                user_id,
                organization_id
            );
            AcceptOutcome::AlreadyMember { organization_id }
        } else {
            let new_membership = NewMembership {
                user_id,
                organization_id,
                role: invitation.role.clone(),
            };
            self.member_repo.add(&new_membership).await?;
            AcceptOutcome::Joined { organization_id }
        };

        self.invitation_repo.delete(invitation.id).await?;

        let key = selected_org_key(&user_id.to_string());
        if let Err(e) = self.cache.set(&key, &organization_id, None).await {
            tracing::warn!("Preference write failed after join for user {}: {}", user_id, e);
        }

        tracing::info!(
            "Invitation {} consumed by user {}: {:?}",
            invitation.id,
            user_id,
            outcome
        );

        Ok(outcome)
    }

    /// List an organisation's pending invitations
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Invitation>> {
        Ok(self.invitation_repo.list_by_organization(organization_id).await?)
    }

    /// Revoke an invitation (consumes it without a join)
    pub async fn revoke(&self, id: Uuid, organization_id: Uuid) -> Result<()> {
        let deleted = self.invitation_repo.delete_scoped(id, organization_id).await?;

        if !deleted {
            return Err(OrgError::NotFound("Invitation not found".to_string()));
        }

        tracing::info!("Invitation revoked: id={}, organization={}", id, organization_id);

        Ok(())
    }
}

fn acceptance_link(base_url: &str, token: &str) -> String {
    format!("{}/accept-invite?token={}", base_url, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::OrganizationService;
    use crate::test_support::{bootstrap_request, stack, unique_email};
    use tickethub_models::membership::roles;

    fn token_from(issued: &IssuedInvitation) -> String {
        issued
            .accept_url
            .split("token=")
            .last()
            .expect("link must carry a token")
            .to_string()
    }

    #[tokio::test]
    #[ignore] // Requires database and Redis
    async fn invitation_is_consumed_exactly_once() {
        let (db, cache, identity) = stack().await;
        let orgs = OrganizationService::new(db.clone(), identity.clone());
        let invitations = InvitationService::new(
            db.clone(),
            identity,
            cache,
            "http://localhost:3000".to_string(),
        );

        let admin = orgs
            .bootstrap(bootstrap_request(&unique_email(), "Consume Once Org"))
            .await
            .unwrap();

        let issued = invitations
            .create(
                admin.organization_id,
                admin.user_id,
                InviteRequest {
                    email: unique_email(),
                    role: roles::COORDINATOR.to_string(),
                },
            )
            .await
            .unwrap();
        let token = token_from(&issued);

        let outcome = invitations
            .accept_with_signup(&token, "ValidP@ssw0rd", "Invited Person")
            .await
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::Joined { .. }));

        // Second consumption must hit the terminal not-found state
        let err = invitations
            .lookup(&token)
            .await
            .expect_err("consumed invitation must be gone");
        assert!(matches!(err, OrgError::InvitationNotFound));
    }

    #[tokio::test]
    #[ignore]
    async fn already_member_acceptance_is_informational_and_still_consumes() {
        let (db, cache, identity) = stack().await;
        let orgs = OrganizationService::new(db.clone(), identity.clone());
        let invitations = InvitationService::new(
            db.clone(),
            identity,
            cache,
            "http://localhost:3000".to_string(),
        );

        let admin_email = unique_email();
        let admin = orgs
            .bootstrap(bootstrap_request(&admin_email, "Already Member Org"))
            .await
            .unwrap();

        // The admin invites their own address and accepts while signed in
        let issued = invitations
            .create(
                admin.organization_id,
                admin.user_id,
                InviteRequest {
                    email: admin_email,
                    role: roles::COORDINATOR.to_string(),
                },
            )
            .await
            .unwrap();
        let token = token_from(&issued);

        let outcome = invitations
            .accept_authenticated(&token, admin.user_id)
            .await
            .unwrap();
        assert!(matches!(outcome, AcceptOutcome::AlreadyMember { .. }));

        // No second membership row
        let members = MembershipRepository::new(db.pool().clone())
            .list_by_organization_with_profiles(admin.organization_id)
            .await
            .unwrap();
        assert_eq!(members.len(), 1);

        // Invitation consumed regardless
        assert!(matches!(
            invitations.lookup(&token).await,
            Err(OrgError::InvitationNotFound)
        ));
    }

    #[test]
    fn test_generate_token_is_opaque_hex() {
        let token = InvitationService::generate_token();

        // 32 random bytes, hex encoded
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        // Two tokens must not collide
        assert_ne!(token, InvitationService::generate_token());
    }

    #[test]
    fn test_acceptance_link_format() {
        let link = acceptance_link("https://tickethub.example", "abc123");
        assert_eq!(link, "https://tickethub.example/accept-invite?token=abc123");
    }

    #[test]
    fn test_accept_outcome_organization_id() {
        let org = Uuid::new_v4();
        assert_eq!(
            AcceptOutcome::Joined { organization_id: org }.organization_id(),
            org
        );
        assert_eq!(
            AcceptOutcome::AlreadyMember { organization_id: org }.organization_id(),
            org
        );
    }
}
