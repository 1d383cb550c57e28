use super::Context;
use crate::api::SearchKind;
use crate::output::format_search_results;
use anyhow::Context as _;

pub(super) async fn run(
    ctx: &Context,
    query: &str,
    kind: SearchKind,
    limit: usize,
) -> anyhow::Result<()> {
    let results = ctx
        .client()?
        .search(kind, query, limit)
        .await
        .with_context(|| format!("Search for '{query}' failed"))?;

    ctx.output.print(&results, |r| format_search_results(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, testing::FakeTransport};
    use crate::commands::test_support::context;
    use crate::config::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_search_needs_no_login() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(200, "[]"))));
        let ctx = context(transport.clone(), Arc::new(MemoryStore::default()));

        run(&ctx, "breaking bad", SearchKind::Show, 3).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/search/show");
        assert!(request.query.contains(&("limit".to_string(), "3".to_string())));
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(200, "[]"))));
        let ctx = context(transport.clone(), Arc::new(MemoryStore::default()));

        assert!(run(&ctx, "   ", SearchKind::Movie, 10).await.is_err());
        assert!(transport.requests().is_empty());
    }
}
