//! The delete confirmation dialog.
//!
//! The dialog owns the "delete in flight" flag for its resource. A delete
//! runs in two halves so callers with an asynchronous transport can keep
//! the dialog pending in between: [`DeleteDialog::begin`] hands out the
//! mutation variables, [`DeleteDialog::complete`] consumes the result. On
//! success the cached search results are reconciled and the dialog closes;
//! on failure the message stays on the dialog and no cache is touched.

use crate::alert::Alert;
use crate::cache::{DeleteOrigin, ReconcileReport, Reconciler, Resource, ResultCache};
use crate::error::{Result, SearchError};
use crate::service::{AccessRequest, AccessReviewer, DeleteRequest, DeleteService};
use tracing::{debug, info, warn};

/// State of the access review for the dialog's resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    Loading,
    Allowed,
    Denied,
    Failed(String),
}

/// API group of a resource, taken from its self link.
///
/// `/apis/<group>/<version>/...` yields `<group>`; core resources under
/// `/api/...` have no group.
pub fn api_group(self_link: &str) -> &str {
    let mut segments = self_link.split('/');
    let _leading = segments.next();
    match (segments.next(), segments.next()) {
        (Some("apis"), Some(group)) => group,
        _ => "",
    }
}

/// Delete confirmation for a single resource.
#[derive(Debug)]
pub struct DeleteDialog {
    resource: Resource,
    current_query: String,
    origin: DeleteOrigin,
    access: AccessState,
    in_flight: bool,
    error: Option<String>,
    open: bool,
}

impl DeleteDialog {
    /// Open the dialog for `resource`, shown while `current_query` is active.
    pub fn open(resource: Resource, current_query: impl Into<String>, origin: DeleteOrigin) -> Self {
        Self {
            resource,
            current_query: current_query.into(),
            origin,
            access: AccessState::Loading,
            in_flight: false,
            error: None,
            open: true,
        }
    }

    pub fn title(&self) -> String {
        format!("Delete {}", self.resource.kind)
    }

    pub fn message(&self) -> String {
        format!(
            "Removing {} is irreversible. Are you sure that you want to continue?",
            self.resource.name
        )
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn access(&self) -> &AccessState {
        &self.access
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Error from the last delete attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The access review to ask for.
    pub fn access_request(&self) -> AccessRequest {
        AccessRequest {
            resource: self.resource.kind.clone(),
            action: "delete".to_string(),
            namespace: self.resource.namespace.clone(),
            name: self.resource.name.clone(),
            api_group: api_group(&self.resource.self_link).to_string(),
        }
    }

    /// Run the access review and record its answer.
    pub fn review_access(&mut self, reviewer: &dyn AccessReviewer) -> &AccessState {
        self.access = match reviewer.review(&self.access_request()) {
            Ok(true) => AccessState::Allowed,
            Ok(false) => AccessState::Denied,
            Err(message) => AccessState::Failed(message),
        };
        &self.access
    }

    /// Whether the delete button is enabled.
    pub fn can_delete(&self) -> bool {
        self.open && !self.in_flight && self.access == AccessState::Allowed
    }

    /// Alerts to render inside the dialog.
    pub fn alerts(&self) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if let AccessState::Failed(message) = &self.access {
            alerts.push(Alert::danger(message.clone()));
        }
        if matches!(self.access, AccessState::Denied | AccessState::Failed(_)) {
            alerts.push(Alert::danger(SearchError::Unauthorized.to_string()));
        }
        if let Some(message) = &self.error {
            alerts.push(Alert::danger(message.clone()));
        }
        alerts
    }

    /// Mark the delete as started and return the mutation variables.
    pub fn begin(&mut self) -> Result<DeleteRequest> {
        if !self.open {
            return Err(SearchError::DialogClosed {
                kind: self.resource.kind.clone(),
                name: self.resource.name.clone(),
            });
        }
        if self.in_flight {
            return Err(SearchError::DeleteInFlight {
                kind: self.resource.kind.clone(),
                name: self.resource.name.clone(),
            });
        }
        match self.access {
            AccessState::Allowed => {}
            AccessState::Loading => {
                return Err(SearchError::AccessPending {
                    kind: self.resource.kind.clone(),
                    name: self.resource.name.clone(),
                });
            }
            AccessState::Denied | AccessState::Failed(_) => return Err(SearchError::Unauthorized),
        }

        self.in_flight = true;
        self.error = None;
        debug!(kind = %self.resource.kind, name = %self.resource.name, "Delete started");

        Ok(DeleteRequest {
            self_link: self.resource.self_link.clone(),
            name: self.resource.name.clone(),
            namespace: self.resource.namespace.clone(),
            cluster: self.resource.cluster.clone(),
            kind: self.resource.kind.clone(),
        })
    }

    /// Finish a delete started with [`DeleteDialog::begin`].
    ///
    /// Only the first completion of a delete reaches the caches; a repeated
    /// one is rejected before anything is patched.
    pub fn complete(
        &mut self,
        outcome: std::result::Result<(), String>,
        reconciler: &Reconciler,
        items_store: &mut dyn ResultCache,
        related_store: &mut dyn ResultCache,
    ) -> Result<ReconcileReport> {
        if !self.in_flight {
            return Err(SearchError::DeleteNotStarted {
                kind: self.resource.kind.clone(),
                name: self.resource.name.clone(),
            });
        }
        self.in_flight = false;

        if let Err(message) = outcome {
            warn!(
                kind = %self.resource.kind,
                name = %self.resource.name,
                error = %message,
                "Delete failed"
            );
            self.error = Some(message.clone());
            return Err(SearchError::DeleteFailed(message));
        }

        let report = reconciler.reconcile(
            self.origin,
            &self.current_query,
            &self.resource,
            items_store,
            related_store,
        );
        info!(kind = %self.resource.kind, name = %self.resource.name, "Resource deleted");
        self.open = false;
        Ok(report)
    }

    /// Delete through a blocking service: begin, call, complete.
    pub fn confirm(
        &mut self,
        service: &mut dyn DeleteService,
        reconciler: &Reconciler,
        items_store: &mut dyn ResultCache,
        related_store: &mut dyn ResultCache,
    ) -> Result<ReconcileReport> {
        let request = self.begin()?;
        let outcome = service.delete_resource(&request);
        self.complete(outcome, reconciler, items_store, related_store)
    }

    /// Dismiss the dialog without deleting.
    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CachedResultEntry, MemoryCache, PatchOutcome, RelatedCount};
    use crate::search::compile;

    struct Reviewer(std::result::Result<bool, String>);

    impl AccessReviewer for Reviewer {
        fn review(&self, _request: &AccessRequest) -> std::result::Result<bool, String> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct FakeDelete {
        fail: Option<String>,
        calls: Vec<DeleteRequest>,
    }

    impl DeleteService for FakeDelete {
        fn delete_resource(&mut self, request: &DeleteRequest) -> std::result::Result<(), String> {
            self.calls.push(request.clone());
            match &self.fail {
                Some(message) => Err(message.clone()),
                None => Ok(()),
            }
        }
    }

    fn deployment() -> Resource {
        Resource::new("d1", "web", "deployment")
            .with_location("local-cluster", "default")
            .with_self_link("/apis/apps/v1/namespaces/default/deployments/web")
    }

    fn allowed_dialog() -> DeleteDialog {
        let mut dialog = DeleteDialog::open(deployment(), "kind:deployment", DeleteOrigin::Results);
        dialog.review_access(&Reviewer(Ok(true)));
        dialog
    }

    fn stores() -> (MemoryCache, MemoryCache) {
        let mut items = MemoryCache::new();
        items.write(
            CacheKey::items(&compile("kind:deployment")),
            CachedResultEntry::Items {
                items: vec![deployment()],
            },
        );
        (items, MemoryCache::new())
    }

    #[test]
    fn test_api_group() {
        assert_eq!(api_group("/apis/apps/v1/namespaces/default/deployments/web"), "apps");
        assert_eq!(api_group("/api/v1/namespaces/default/pods/web-1"), "");
        assert_eq!(api_group(""), "");
    }

    #[test]
    fn test_access_request() {
        let dialog = DeleteDialog::open(deployment(), "", DeleteOrigin::Results);
        let request = dialog.access_request();
        assert_eq!(request.resource, "deployment");
        assert_eq!(request.action, "delete");
        assert_eq!(request.namespace, "default");
        assert_eq!(request.name, "web");
        assert_eq!(request.api_group, "apps");
    }

    #[test]
    fn test_text() {
        let dialog = DeleteDialog::open(deployment(), "", DeleteOrigin::Results);
        assert_eq!(dialog.title(), "Delete deployment");
        assert_eq!(
            dialog.message(),
            "Removing web is irreversible. Are you sure that you want to continue?"
        );
    }

    #[test]
    fn test_disabled_while_loading_or_denied() {
        let mut dialog = DeleteDialog::open(deployment(), "", DeleteOrigin::Results);
        assert!(!dialog.can_delete());
        assert!(matches!(dialog.begin(), Err(SearchError::AccessPending { .. })));

        dialog.review_access(&Reviewer(Ok(false)));
        assert!(!dialog.can_delete());
        assert!(matches!(dialog.begin(), Err(SearchError::Unauthorized)));
        assert_eq!(dialog.alerts().len(), 1);

        dialog.review_access(&Reviewer(Err("forbidden".to_string())));
        assert!(!dialog.can_delete());
        assert_eq!(dialog.alerts().len(), 2);
    }

    #[test]
    fn test_second_delete_rejected_while_in_flight() {
        let mut dialog = allowed_dialog();
        let request = dialog.begin().unwrap();
        assert_eq!(request.kind, "deployment");
        assert_eq!(request.cluster, "local-cluster");
        assert!(dialog.is_in_flight());
        assert!(!dialog.can_delete());
        assert!(matches!(dialog.begin(), Err(SearchError::DeleteInFlight { .. })));
    }

    #[test]
    fn test_confirm_success_reconciles_and_closes() {
        let mut dialog = allowed_dialog();
        let (mut items, mut related) = stores();
        let mut service = FakeDelete::default();

        let report = dialog
            .confirm(&mut service, &Reconciler::default(), &mut items, &mut related)
            .unwrap();

        assert_eq!(service.calls.len(), 1);
        assert_eq!(
            service.calls[0].self_link,
            "/apis/apps/v1/namespaces/default/deployments/web"
        );
        assert_eq!(report.items, Some(PatchOutcome::Patched { removed: 1 }));
        assert!(!dialog.is_open());
        assert!(!dialog.is_in_flight());
    }

    #[test]
    fn test_confirm_failure_keeps_dialog_and_cache() {
        let mut dialog = allowed_dialog();
        let (mut items, mut related) = stores();
        let before = items.clone();
        let mut service = FakeDelete {
            fail: Some("resource is protected".to_string()),
            ..Default::default()
        };

        let result = dialog.confirm(&mut service, &Reconciler::default(), &mut items, &mut related);

        assert!(matches!(result, Err(SearchError::DeleteFailed(_))));
        assert!(dialog.is_open());
        assert!(!dialog.is_in_flight());
        assert_eq!(dialog.error(), Some("resource is protected"));
        assert_eq!(items, before);
        assert!(dialog.can_delete());
    }

    #[test]
    fn test_complete_twice_patches_once() {
        let pod = Resource::new("p1", "web-1", "pod").with_location("local-cluster", "default");
        let mut dialog = DeleteDialog::open(pod, "kind:deployment", DeleteOrigin::Related);
        dialog.review_access(&Reviewer(Ok(true)));

        let count_key = CacheKey::related_count(&compile("kind:deployment"));
        let mut items = MemoryCache::new();
        let mut related = MemoryCache::new();
        related.write(
            count_key.clone(),
            CachedResultEntry::RelatedCount {
                related: vec![RelatedCount {
                    kind: "pod".to_string(),
                    count: 3,
                }],
            },
        );

        dialog.begin().unwrap();
        dialog
            .complete(Ok(()), &Reconciler::default(), &mut items, &mut related)
            .unwrap();
        let repeated = dialog.complete(Ok(()), &Reconciler::default(), &mut items, &mut related);

        assert!(matches!(repeated, Err(SearchError::DeleteNotStarted { .. })));
        assert_eq!(
            related.read(&count_key),
            Some(CachedResultEntry::RelatedCount {
                related: vec![RelatedCount {
                    kind: "pod".to_string(),
                    count: 2,
                }],
            })
        );
    }

    #[test]
    fn test_complete_without_begin_rejected() {
        let mut dialog = allowed_dialog();
        let (mut items, mut related) = stores();
        let before = items.clone();

        let result = dialog.complete(Ok(()), &Reconciler::default(), &mut items, &mut related);

        assert!(matches!(result, Err(SearchError::DeleteNotStarted { .. })));
        assert_eq!(items, before);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_begin_rejected_once_closed() {
        let mut dialog = allowed_dialog();
        let (mut items, mut related) = stores();
        let mut service = FakeDelete::default();
        dialog
            .confirm(&mut service, &Reconciler::default(), &mut items, &mut related)
            .unwrap();

        assert!(matches!(dialog.begin(), Err(SearchError::DialogClosed { .. })));
        assert!(!dialog.is_in_flight());

        let mut dismissed = allowed_dialog();
        dismissed.close();
        assert!(!dismissed.can_delete());
        assert!(matches!(dismissed.begin(), Err(SearchError::DialogClosed { .. })));
    }
}
