use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickethub_auth::IdentityService;
use tickethub_database::{Database, MembershipRepository, OrganizationRepository};
use tickethub_models::membership::roles;
use tickethub_models::{NewMembership, NewOrganization, Organization};
use uuid::Uuid;
use validator::Validate;

/// Sign-up form: one submission creates the identity, the organisation,
/// the mirrored profile, and the first admin membership.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BootstrapRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    #[validate(length(min = 1, max = 255))]
    pub organization_name: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,

    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BootstrapOutcome {
    pub organization_id: Uuid,
    pub user_id: Uuid,
}

pub struct OrganizationService {
    identity: Arc<IdentityService>,
    org_repo: OrganizationRepository,
    member_repo: MembershipRepository,
}

impl OrganizationService {
    pub fn new(db: Database, identity: Arc<IdentityService>) -> Self {
        let pool = db.pool().clone();

        Self {
            identity,
            org_repo: OrganizationRepository::new(pool.clone()),
            member_repo: MembershipRepository::new(pool),
        }
    }

    /// Organisation sign-up. Steps run strictly in order with no
    /// cross-step transaction:
    ///   (a) create the identity — failure aborts, nothing else happened;
    ///   (b) insert the organisation — failure leaves the identity orphaned,
    ///       reported but not rolled back;
    ///   (c) mirror the profile — failure logged, tolerated;
    ///   (d) insert the admin membership — failure logged, tolerated.
    /// On success the caller is expected to sign in; no tokens are issued.
    pub async fn bootstrap(&self, request: BootstrapRequest) -> Result<BootstrapOutcome> {
        request.validate()?;

        let user = self
            .identity
            .sign_up(&request.email, &request.password)
            .await?;

        let new_org = NewOrganization {
            name: request.organization_name,
            email: request.email,
            city: request.city,
            state: request.state,
            country: request.country,
            website: request.website,
        };

        let org = match self.org_repo.create(&new_org).await {
            Ok(org) => org,
            Err(e) => {
                tracing::error!(
                    "Organisation insert failed after identity {} was created; identity left in place: {}",
                    user.id,
                    e
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self.identity.mirror_profile(&user, &request.full_name).await {
            tracing::warn!("Profile mirror failed for user {}: {}", user.id, e);
        }

        let admin_membership = NewMembership {
            user_id: user.id,
            organization_id: org.id,
            role: roles::ADMIN.to_string(),
        };

        if let Err(e) = self.member_repo.add(&admin_membership).await {
            tracing::error!(
                "Admin membership insert failed for organisation {}: {}",
                org.id,
                e
            );
        }

        tracing::info!(
            "Organisation bootstrapped: id={}, name={}, admin_user_id={}",
            org.id,
            org.name,
            user.id
        );

        Ok(BootstrapOutcome {
            organization_id: org.id,
            user_id: user.id,
        })
    }

    /// Fetch an organisation record (for context rendering)
    pub async fn organization(&self, id: Uuid) -> Result<Organization> {
        Ok(self.org_repo.find_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrgError;
    use crate::test_support::{bootstrap_request, stack, unique_email};
    use tickethub_auth::AuthError;

    #[tokio::test]
    #[ignore] // Requires database and Redis
    async fn bootstrap_creates_exactly_one_admin_membership() {
        let (db, _cache, identity) = stack().await;
        let service = OrganizationService::new(db.clone(), identity);

        let email = unique_email();
        let outcome = service
            .bootstrap(bootstrap_request(&email, "Springfield Food Bank"))
            .await
            .expect("bootstrap failed");

        let members = MembershipRepository::new(db.pool().clone())
            .list_by_organization_with_profiles(outcome.organization_id)
            .await
            .unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, roles::ADMIN);
        assert_eq!(members[0].user_id, outcome.user_id);
        assert_eq!(members[0].email, email);
    }

    #[tokio::test]
    #[ignore]
    async fn duplicate_email_aborts_before_any_organisation_insert() {
        let (db, _cache, identity) = stack().await;
        let service = OrganizationService::new(db.clone(), identity);

        let email = unique_email();
        service
            .bootstrap(bootstrap_request(&email, "First Org"))
            .await
            .expect("first bootstrap failed");

        let err = service
            .bootstrap(bootstrap_request(&email, "Second Org"))
            .await
            .expect_err("duplicate email must fail");

        assert!(matches!(
            err,
            OrgError::Identity(AuthError::AlreadyExists(_))
        ));
    }
}
