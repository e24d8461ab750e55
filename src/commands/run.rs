//! Non-interactive entry point: `reelgen run <workflow> <account-id>`.
//! External time-based triggers invoke this once per scheduled upload.

use crate::adapters::Adapters;
use crate::commands::youtube;
use crate::context::AppContext;
use crate::error::{ReelgenError, ReelgenResult};
use crate::status;
use crate::store::{Account, Provider, Store};

pub struct WorkflowRequest {
    pub provider: Provider,
    pub account: Account,
}

/// Validate the workflow name and account id against the store.
/// Runs before any adapter is constructed, so a bad invocation can never
/// reach a provider.
pub fn resolve(store: &Store, workflow: &str, account_id: &str) -> ReelgenResult<WorkflowRequest> {
    let provider: Provider = workflow.parse()?;
    if provider != Provider::YouTube {
        return Err(ReelgenError::UnknownWorkflow(workflow.trim().to_string()));
    }

    let id = account_id.trim();
    if id.is_empty() {
        return Err(ReelgenError::UnknownAccount("<empty>".into()));
    }

    let account = store
        .find_account(provider, id)?
        .ok_or_else(|| ReelgenError::UnknownAccount(id.to_string()))?;

    Ok(WorkflowRequest { provider, account })
}

pub fn run(ctx: &AppContext, workflow: &str, account_id: &str) -> ReelgenResult<()> {
    let store = Store::new(ctx.workspace.cache_dir());
    let request = resolve(&store, workflow, account_id)?;

    if ctx.config.verbose()? {
        status::info(&format!(
            "Running {} workflow for {}",
            request.provider, request.account.nickname
        ));
    }

    let adapters = Adapters::from_context(ctx)?;
    let session = youtube::generate_short(ctx, &adapters, &request.account)?;
    youtube::upload_short(ctx, &adapters, &request.account, &session)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store_with_account(id: &str) -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().to_path_buf());
        store
            .add_account(
                Provider::YouTube,
                Account {
                    id: id.into(),
                    nickname: "nick".into(),
                    niche: "chess".into(),
                    language: "English".into(),
                    videos: vec![],
                },
            )
            .unwrap();
        (dir, store)
    }

    #[test]
    fn test_resolve_known_account() {
        let (_dir, store) = make_store_with_account("abc");
        let request = resolve(&store, "youtube", "abc").unwrap();
        assert_eq!(request.provider, Provider::YouTube);
        assert_eq!(request.account.id, "abc");
    }

    #[test]
    fn test_resolve_unknown_workflow() {
        let (_dir, store) = make_store_with_account("abc");
        assert!(matches!(
            resolve(&store, "tiktok", "abc"),
            Err(ReelgenError::UnknownWorkflow(_))
        ));
        // Twitter accounts exist in the store, but only youtube runs.
        assert!(matches!(
            resolve(&store, "twitter", "abc"),
            Err(ReelgenError::UnknownWorkflow(_))
        ));
    }

    #[test]
    fn test_resolve_unknown_account() {
        let (_dir, store) = make_store_with_account("abc");
        assert!(matches!(
            resolve(&store, "youtube", "ghost"),
            Err(ReelgenError::UnknownAccount(_))
        ));
    }

    #[test]
    fn test_resolve_empty_account_id() {
        let (_dir, store) = make_store_with_account("abc");
        assert!(matches!(
            resolve(&store, "youtube", "  "),
            Err(ReelgenError::UnknownAccount(_))
        ));
    }
}
