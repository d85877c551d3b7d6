//! Age reconciliation - role membership derived from birth years
//!
//! A run reads rules and a member snapshot, computes the diff, then commits,
//! notifies and propagates it. Only the initial reads can fail the run;
//! every side effect after that is best-effort.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use roster_core::{
    AgeThresholdRule, ChangeAction, MemberSnapshot, NewNotification, NewSyncEvent, RoleChange,
    RoleSyncKind, AGE_ROLE_CHANGE,
};

use super::context::SyncContext;
use super::error::ServiceResult;

/// Diff between the roles members should hold and the roles they hold
///
/// Members without a birth year are left out entirely.
pub fn compute_changes(
    rules: &[AgeThresholdRule],
    members: &[MemberSnapshot],
    reference_year: i32,
) -> Vec<RoleChange> {
    let mut changes = Vec::new();

    for rule in rules {
        for member in members {
            let Some(age) = member.age_in(reference_year) else {
                continue;
            };

            let should_have = rule.matches(age);
            let has = member.has_role(rule.role_id);

            if should_have && !has {
                changes.push(RoleChange::assigned(member.member_id, rule.role_id));
            } else if !should_have && has {
                changes.push(RoleChange::removed(member.member_id, rule.role_id));
            }
        }
    }

    changes
}

/// Age reconciliation service
pub struct AgeReconciliationService<'a> {
    ctx: &'a SyncContext,
}

impl<'a> AgeReconciliationService<'a> {
    /// Create a new AgeReconciliationService
    pub fn new(ctx: &'a SyncContext) -> Self {
        Self { ctx }
    }

    /// Reconcile a team's age-based roles as of `reference_year`
    ///
    /// Returns every computed change, whether or not its side effects
    /// succeeded.
    ///
    /// # Errors
    /// Fails only if the rules or the member snapshot cannot be loaded.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, team_id: Uuid, reference_year: i32) -> ServiceResult<Vec<RoleChange>> {
        let rules = self.ctx.age_rule_repo().find_by_team(team_id).await?;
        let members = self.ctx.member_repo().snapshot(team_id).await?;

        let changes = compute_changes(&rules, &members, reference_year);
        if changes.is_empty() {
            info!(rules = rules.len(), members = members.len(), "Age roles already up to date");
            return Ok(changes);
        }

        let committed = self.commit(&changes).await;
        let view = RunView::new(&rules, &members);

        self.notify(team_id, &view, &members, &committed).await;
        self.propagate(team_id, &view, &committed).await;

        info!(
            changes = changes.len(),
            committed = committed.len(),
            "Age reconciliation complete"
        );

        Ok(changes)
    }

    /// Apply each change independently, keeping the ones that stuck
    async fn commit<'c>(&self, changes: &'c [RoleChange]) -> Vec<&'c RoleChange> {
        let members = self.ctx.member_repo();
        let mut committed = Vec::with_capacity(changes.len());

        for change in changes {
            let result = match change.action {
                ChangeAction::Assigned => members.assign_role(change.member_id, change.role_id).await,
                ChangeAction::Removed => members.unassign_role(change.member_id, change.role_id).await,
            };

            match result {
                Ok(()) => committed.push(change),
                Err(e) => warn!(
                    member_id = %change.member_id,
                    role_id = %change.role_id,
                    action = %change.action,
                    error = %e,
                    "Failed to commit role change"
                ),
            }
        }

        committed
    }

    /// One notification per (admin, change), in a single insert
    async fn notify(
        &self,
        team_id: Uuid,
        view: &RunView<'_>,
        members: &[MemberSnapshot],
        committed: &[&RoleChange],
    ) {
        let mut seen = HashSet::new();
        let admins: Vec<Uuid> = members
            .iter()
            .filter(|m| m.is_admin)
            .filter_map(|m| m.user_id)
            .filter(|user_id| seen.insert(*user_id))
            .collect();

        let notifications: Vec<NewNotification> = admins
            .iter()
            .flat_map(|admin| {
                committed
                    .iter()
                    .map(move |change| notification(team_id, *admin, view, change))
            })
            .collect();

        if notifications.is_empty() {
            debug!("No admins to notify");
            return;
        }

        match self.ctx.notification_repo().insert_many(&notifications).await {
            Ok(count) => debug!(count, "Admins notified"),
            Err(e) => warn!(error = %e, "Failed to insert notifications"),
        }
    }

    /// Feed committed changes into the role stream
    async fn propagate(&self, team_id: Uuid, view: &RunView<'_>, committed: &[&RoleChange]) {
        let guild_id = match self.ctx.team_repo().find_external_guild(team_id).await {
            Ok(Some(guild_id)) => guild_id,
            Ok(None) => {
                debug!("Team has no linked guild, not propagating");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Could not check guild link, not propagating");
                return;
            }
        };

        let recorder = self.ctx.recorder();
        for change in committed {
            // A member without a chat account still gets an event; the
            // processor records it as failed
            let external_user_id = view
                .member(change.member_id)
                .and_then(|m| m.external_user_id);

            let kind = match change.action {
                ChangeAction::Assigned => RoleSyncKind::Assigned,
                ChangeAction::Removed => RoleSyncKind::Unassigned,
            };
            let mut event = NewSyncEvent::new(team_id, guild_id, kind, change.role_id)
                .with_member(change.member_id, external_user_id);
            if let Some(name) = view.role_name(change.role_id) {
                event = event.with_subject_name(name);
            }

            // Failures are logged by the recorder
            let _ = recorder.append_role(&event).await;
        }
    }
}

/// Lookups over one run's inputs
struct RunView<'a> {
    role_names: HashMap<Uuid, &'a str>,
    members: HashMap<Uuid, &'a MemberSnapshot>,
}

impl<'a> RunView<'a> {
    fn new(rules: &'a [AgeThresholdRule], members: &'a [MemberSnapshot]) -> Self {
        Self {
            role_names: rules.iter().map(|r| (r.role_id, r.role_name.as_str())).collect(),
            members: members.iter().map(|m| (m.member_id, m)).collect(),
        }
    }

    fn role_name(&self, role_id: Uuid) -> Option<&'a str> {
        self.role_names.get(&role_id).copied()
    }

    fn member(&self, member_id: Uuid) -> Option<&'a MemberSnapshot> {
        self.members.get(&member_id).copied()
    }
}

fn notification(team_id: Uuid, admin: Uuid, view: &RunView<'_>, change: &RoleChange) -> NewNotification {
    let member = view
        .member(change.member_id)
        .map_or("A member", |m| m.display_name.as_str());
    let role = view.role_name(change.role_id).unwrap_or("a role");

    let (title, body) = match change.action {
        ChangeAction::Assigned => (
            "Age role assigned",
            format!("{member} was given the {role} role based on age rules."),
        ),
        ChangeAction::Removed => (
            "Age role removed",
            format!("{member} no longer has the {role} role based on age rules."),
        ),
    };

    NewNotification {
        team_id,
        user_id: admin,
        kind: AGE_ROLE_CHANGE.to_string(),
        title: title.to_string(),
        body,
    }
}
