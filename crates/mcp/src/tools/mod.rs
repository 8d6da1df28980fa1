pub mod employees;
pub mod organizations;
pub mod people;
mod registry;

pub use employees::EmployeesOfCompanyTool;
pub use organizations::{OrganizationEnrichmentTool, OrganizationJobPostingsTool, OrganizationSearchTool};
pub use people::{PeopleEnrichmentTool, PeopleSearchTool, PersonEmailTool};
pub use registry::{
    json_schema_array, json_schema_object, json_schema_string, json_schema_string_array, Tool,
    ToolRegistry,
};

use crate::protocol::CallToolResult;
use anyhow::{Context, Result};
use apollo_io_sdk::{ApolloClient, ApolloResult};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Names of the Apollo tools, in catalog order.
pub const TOOL_NAMES: [&str; 7] = [
    "people_enrichment",
    "organization_enrichment",
    "people_search",
    "organization_search",
    "organization_job_postings",
    "get_person_email",
    "employees_of_company",
];

/// Build the registry holding every Apollo tool.
pub fn apollo_tools(client: ApolloClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(PeopleEnrichmentTool::new(client.clone())));
    registry.register(Arc::new(OrganizationEnrichmentTool::new(client.clone())));
    registry.register(Arc::new(PeopleSearchTool::new(client.clone())));
    registry.register(Arc::new(OrganizationSearchTool::new(client.clone())));
    registry.register(Arc::new(OrganizationJobPostingsTool::new(client.clone())));
    registry.register(Arc::new(PersonEmailTool::new(client.clone())));
    registry.register(Arc::new(EmployeesOfCompanyTool::new(client)));

    registry
}

/// Deserialize tool arguments; `null` counts as an empty object.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).with_context(|| format!("Invalid arguments for {}", tool))
}

/// Render a client result as pretty JSON text.
///
/// A failed call is logged and rendered as `null`.
pub(crate) fn render<T: Serialize>(tool: &str, result: ApolloResult<T>) -> Result<CallToolResult> {
    let json = match result {
        Ok(value) => serde_json::to_string_pretty(&value)?,
        Err(e) => {
            tracing::error!(tool = tool, status = ?e.status(), error = %e, "Apollo call failed");
            serde_json::to_string_pretty(&serde_json::Value::Null)?
        }
    };
    Ok(CallToolResult::text(json))
}
