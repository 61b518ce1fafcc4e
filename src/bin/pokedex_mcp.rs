//! Pokedex MCP Server
//!
//! A Model Context Protocol server over stdio (rmcp) that exposes the three
//! catalog lookups as tools. Logs go to stderr; stdout belongs to the
//! transport.

use std::sync::Arc;

use pokedex::rpc::mcp_error;
use pokedex::{catalog, LookupError, LookupService, PokedexConfig, RateLimiter};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use tokio::io::{stdin, stdout};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    lookup: Arc<LookupService>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPokemonRequest {
    #[schemars(description = "Pokemon name, case-insensitive, at least 2 characters")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPokemonArrayRequest {
    #[schemars(description = "Up to 10 Pokemon names")]
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPokemonByTypeRequest {
    #[schemars(description = "Type name such as 'fire' or 'poison'")]
    pub kind: String,
}

#[tool_router]
impl PokedexService {
    pub fn new(lookup: Arc<LookupService>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            lookup,
        }
    }

    #[tool(description = "Look up a single Pokemon by name")]
    async fn get_pokemon(
        &self,
        Parameters(request): Parameters<GetPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.lookup.get_by_name(&request.name).await)
    }

    #[tool(description = "Look up several Pokemon by name in one call")]
    async fn get_pokemon_array(
        &self,
        Parameters(request): Parameters<GetPokemonArrayRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.lookup.get_many_by_name(&request.names).await)
    }

    #[tool(description = "List every Pokemon that has the given type")]
    async fn get_pokemon_by_type(
        &self,
        Parameters(request): Parameters<GetPokemonByTypeRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.lookup.get_by_kind(&request.kind).await)
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

fn respond<T: Serialize>(outcome: Result<T, LookupError>) -> Result<CallToolResult, McpError> {
    let output = outcome.map_err(|err| mcp_error(&err))?;
    let text = serde_json::to_string_pretty(&output).map_err(|err| {
        error!(error = %err, "failed to serialize tool output");
        mcp_error(&LookupError::Internal)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = PokedexConfig::from_env()?;
    let store = catalog::open(&config).await?;
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let lookup = Arc::new(LookupService::new(store, limiter));
    let limits = lookup.limiter().config();
    let service = PokedexService::new(lookup);

    info!(
        window_ms = limits.window_ms,
        max_requests = limits.max_requests,
        "Pokedex MCP server starting"
    );
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    info!(?quit_reason, "Pokedex MCP server exiting");
    Ok(())
}
