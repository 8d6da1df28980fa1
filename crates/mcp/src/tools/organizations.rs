// Organization tools: enrichment, search and job postings

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_object, json_schema_string, json_schema_string_array, parse_args, render, Tool,
};
use anyhow::Result;
use apollo_io_sdk::{ApolloClient, OrganizationEnrichmentQuery, OrganizationSearchQuery};
use serde::Deserialize;

/// Tool to enrich one company
pub struct OrganizationEnrichmentTool {
    client: ApolloClient,
}

impl OrganizationEnrichmentTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for OrganizationEnrichmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "organization_enrichment".to_string(),
            description: "Use the Organization Enrichment endpoint to enrich data for 1 company"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "domain": json_schema_string("Company domain"),
                    "name": json_schema_string("Company name")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let query: OrganizationEnrichmentQuery = parse_args("organization_enrichment", arguments)?;
        render(
            "organization_enrichment",
            self.client.organizations().enrich(&query).await,
        )
    }
}

/// Tool to search organizations
pub struct OrganizationSearchTool {
    client: ApolloClient,
}

impl OrganizationSearchTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for OrganizationSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "organization_search".to_string(),
            description: "Use the Organization Search endpoint to find organizations".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "q_organization_domains_list": json_schema_string_array("List of organization domains to search for"),
                    "organization_locations": json_schema_string_array("List of organization locations to search for")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let query: OrganizationSearchQuery = parse_args("organization_search", arguments)?;
        render(
            "organization_search",
            self.client.organizations().search(&query).await,
        )
    }
}

/// Tool to list an organization's job postings
pub struct OrganizationJobPostingsTool {
    client: ApolloClient,
}

impl OrganizationJobPostingsTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct JobPostingsArgs {
    #[serde(default)]
    organization_id: String,
}

#[async_trait::async_trait]
impl Tool for OrganizationJobPostingsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "organization_job_postings".to_string(),
            description: "Use the Organization Job Postings endpoint to find job postings for a specific organization".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "organization_id": json_schema_string("Apollo.io organization ID")
                }),
                vec!["organization_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: JobPostingsArgs = parse_args("organization_job_postings", arguments)?;
        render(
            "organization_job_postings",
            self.client
                .organizations()
                .job_postings(&args.organization_id)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_organization_enrichment_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/enrich"))
            .and(query_param("domain", "apollo.io"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organization": {"name": "Apollo.io"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = OrganizationEnrichmentTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"domain": "apollo.io"}))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(body["organization"]["name"], "Apollo.io");
    }

    #[tokio::test]
    async fn test_job_postings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/o1/job_postings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organization_job_postings": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = OrganizationJobPostingsTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"organization_id": "o1"}))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(body["organization_job_postings"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_upstream_error_renders_null() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mixed_companies/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let tool = OrganizationSearchTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"organization_locations": ["Japan"]}))
            .await
            .unwrap();

        assert_eq!(result.content[0].as_text(), "null");
    }
}
