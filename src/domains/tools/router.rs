//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! One route per `ToolName`; every route validates and dispatches through
//! the shared `ToolRegistry`, so STDIO/TCP and HTTP behave identically.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};
use serde_json::Value;

use super::registry::{ToolName, ToolRegistry};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolName::ALL
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(create_route(registry.clone(), tool))
        })
}

/// Create a ToolRoute for STDIO/TCP transport.
fn create_route<S>(registry: Arc<ToolRegistry>, tool: ToolName) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(tool.definition(), move |ctx: ToolCallContext<'_, S>| {
        let registry = registry.clone();
        let args = ctx.arguments.clone().unwrap_or_default();
        async move {
            registry
                .call_tool_result(tool.as_str(), Value::Object(args))
                .await
        }
        .boxed()
    })
}
