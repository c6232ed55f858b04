use crate::error::Result;
use tickethub_cache::{selected_org_key, Cache};
use tickethub_database::{Database, MembershipRepository};
use tickethub_models::Membership;
use uuid::Uuid;

/// Resolves which organisation a user is currently acting in.
///
/// The selected-organisation preference lives in the cache keyed by user id.
/// It is advisory: resolution validates it against the membership set on
/// every call and repairs it when it is stale. The read-then-write is not
/// atomic; the preference only decides which organisation's data is shown
/// next, never the correctness of stored data.
pub struct OrgResolver {
    member_repo: MembershipRepository,
    cache: Cache,
}

impl OrgResolver {
    pub fn new(db: Database, cache: Cache) -> Self {
        Self {
            member_repo: MembershipRepository::new(db.pool().clone()),
            cache,
        }
    }

    /// Resolve the current organisation for a user, or None when the user
    /// has no memberships (callers render a "no organisation" state).
    pub async fn resolve(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        let key = selected_org_key(&user_id.to_string());

        let preferred: Option<Uuid> = match self.cache.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Preference read failed for user {}: {}", user_id, e);
                None
            }
        };

        let memberships = self.member_repo.list_by_user(user_id).await?;
        let selected = select_current(preferred, &memberships);

        if let Some(organization_id) = selected {
            if preferred != Some(organization_id) {
                if let Err(e) = self.cache.set(&key, &organization_id, None).await {
                    tracing::warn!("Preference write failed for user {}: {}", user_id, e);
                }
            }
        }

        Ok(selected)
    }

    /// Overwrite the preference unconditionally. No membership check here;
    /// the next resolution validates lazily.
    pub async fn switch(&self, user_id: Uuid, organization_id: Uuid) -> Result<()> {
        let key = selected_org_key(&user_id.to_string());
        self.cache.set(&key, &organization_id, None).await?;

        tracing::info!(
            "Selected organisation for user {} switched to {}",
            user_id,
            organization_id
        );

        Ok(())
    }
}

/// Selection rule: keep a preference that matches a membership, otherwise
/// fall back to the first membership (the repository orders by joined_at,
/// so "first" is stable across calls).
fn select_current(preferred: Option<Uuid>, memberships: &[Membership]) -> Option<Uuid> {
    if let Some(organization_id) = preferred {
        if memberships
            .iter()
            .any(|m| m.organization_id == organization_id)
        {
            return Some(organization_id);
        }
    }

    memberships.first().map(|m| m.organization_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::OrganizationService;
    use crate::invitations::{InvitationService, InviteRequest};
    use crate::test_support::{bootstrap_request, stack, unique_email};
    use chrono::{NaiveTime, Utc};
    use tickethub_database::TemplateRepository;
    use tickethub_models::membership::roles;
    use tickethub_models::NewTemplate;

    fn membership(organization_id: Uuid) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            organization_id,
            role: roles::COORDINATOR.to_string(),
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn no_memberships_resolves_to_none() {
        assert_eq!(select_current(None, &[]), None);
        assert_eq!(select_current(Some(Uuid::new_v4()), &[]), None);
    }

    #[test]
    fn no_preference_picks_first_membership() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let memberships = vec![membership(a), membership(b)];

        assert_eq!(select_current(None, &memberships), Some(a));
        // Repeated calls must not alternate
        assert_eq!(select_current(None, &memberships), Some(a));
    }

    #[test]
    fn valid_preference_is_kept() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let memberships = vec![membership(a), membership(b)];

        assert_eq!(select_current(Some(b), &memberships), Some(b));
    }

    #[test]
    fn stale_preference_falls_back_to_first() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let memberships = vec![membership(a), membership(b)];

        assert_eq!(select_current(Some(gone), &memberships), Some(a));
    }

    fn distribution_template(name: &str) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            ticket_type: "numbered".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            tickets_per_period: 30,
            number_of_periods: 4,
            additional_info: None,
        }
    }

    #[tokio::test]
    #[ignore] // Requires database and Redis
    async fn switching_changes_the_scoped_template_listing() {
        let (db, cache, identity) = stack().await;
        let orgs = OrganizationService::new(db.clone(), identity.clone());
        let invitations = InvitationService::new(
            db.clone(),
            identity,
            cache.clone(),
            "http://localhost:3000".to_string(),
        );
        let resolver = OrgResolver::new(db.clone(), cache);
        let template_repo = TemplateRepository::new(db.pool().clone());

        // One user holding memberships in two organisations
        let user_email = unique_email();
        let first = orgs
            .bootstrap(bootstrap_request(&user_email, "First Pantry"))
            .await
            .unwrap();
        let other_admin = orgs
            .bootstrap(bootstrap_request(&unique_email(), "Second Pantry"))
            .await
            .unwrap();

        let issued = invitations
            .create(
                other_admin.organization_id,
                other_admin.user_id,
                InviteRequest {
                    email: user_email,
                    role: roles::COORDINATOR.to_string(),
                },
            )
            .await
            .unwrap();
        let token = issued
            .accept_url
            .split("token=")
            .last()
            .unwrap()
            .to_string();
        invitations
            .accept_authenticated(&token, first.user_id)
            .await
            .unwrap();

        // One template per organisation
        let mine = template_repo
            .create(first.organization_id, &distribution_template("Morning Run"))
            .await
            .unwrap();
        let theirs = template_repo
            .create(
                other_admin.organization_id,
                &distribution_template("Evening Run"),
            )
            .await
            .unwrap();

        for (selected, visible, hidden) in [
            (first.organization_id, mine.id, theirs.id),
            (other_admin.organization_id, theirs.id, mine.id),
        ] {
            resolver.switch(first.user_id, selected).await.unwrap();

            let resolved = resolver.resolve(first.user_id).await.unwrap();
            assert_eq!(resolved, Some(selected));

            let listed = template_repo.list_by_organization(selected).await.unwrap();
            assert!(listed.iter().all(|t| t.organization_id == selected));
            assert!(listed.iter().any(|t| t.id == visible));
            assert!(!listed.iter().any(|t| t.id == hidden));
        }
    }
}
