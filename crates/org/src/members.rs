use crate::error::{OrgError, Result};
use tickethub_database::{Database, MembershipRepository};
use tickethub_models::membership::roles;
use tickethub_models::MembershipWithProfile;
use uuid::Uuid;

pub fn is_valid_role(role: &str) -> bool {
    matches!(role, roles::ADMIN | roles::COORDINATOR)
}

pub struct MemberService {
    member_repo: MembershipRepository,
}

impl MemberService {
    pub fn new(db: Database) -> Self {
        Self {
            member_repo: MembershipRepository::new(db.pool().clone()),
        }
    }

    /// List an organisation's members with their profiles
    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<MembershipWithProfile>> {
        Ok(self
            .member_repo
            .list_by_organization_with_profiles(organization_id)
            .await?)
    }

    /// Remove a member. Refuses to remove the last remaining admin so an
    /// organisation can never be orphaned.
    pub async fn remove(&self, user_id: Uuid, organization_id: Uuid) -> Result<()> {
        let is_admin = self
            .member_repo
            .has_role(user_id, organization_id, roles::ADMIN)
            .await?;

        if is_admin {
            let admin_count = self.member_repo.count_admins(organization_id).await?;
            if admin_count <= 1 {
                return Err(OrgError::Forbidden(
                    "Cannot remove the last admin of an organisation".to_string(),
                ));
            }
        }

        let removed = self.member_repo.remove(user_id, organization_id).await?;

        if !removed {
            return Err(OrgError::NotFound("Membership not found".to_string()));
        }

        tracing::info!(
            "Member removed: user={}, organization={}",
            user_id,
            organization_id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_role() {
        assert!(is_valid_role(roles::ADMIN));
        assert!(is_valid_role(roles::COORDINATOR));
        assert!(!is_valid_role("owner"));
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("Admin"));
    }
}
