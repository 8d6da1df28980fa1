// People tools: enrichment, search and email reveal

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_object, json_schema_string, json_schema_string_array, parse_args, render, Tool,
};
use anyhow::Result;
use apollo_io_sdk::{ApolloClient, PeopleEnrichmentQuery, PeopleSearchQuery};
use serde::Deserialize;

/// Tool to enrich one person
pub struct PeopleEnrichmentTool {
    client: ApolloClient,
}

impl PeopleEnrichmentTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for PeopleEnrichmentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "people_enrichment".to_string(),
            description: "Use the People Enrichment endpoint to enrich data for 1 person"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "first_name": json_schema_string("Person's first name"),
                    "last_name": json_schema_string("Person's last name"),
                    "email": json_schema_string("Person's email address"),
                    "domain": json_schema_string("Company domain"),
                    "organization_name": json_schema_string("Organization name"),
                    "linkedin_url": json_schema_string("Person's LinkedIn profile URL")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let query: PeopleEnrichmentQuery = parse_args("people_enrichment", arguments)?;
        render("people_enrichment", self.client.people().enrich(&query).await)
    }
}

/// Tool to search people
pub struct PeopleSearchTool {
    client: ApolloClient,
}

impl PeopleSearchTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for PeopleSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "people_search".to_string(),
            description: "Use the People Search endpoint to find people".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "q_organization_domains_list": json_schema_string_array("List of organization domains to search within"),
                    "person_titles": json_schema_string_array("List of job titles to search for"),
                    "person_seniorities": json_schema_string_array("List of seniority levels to search for")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let query: PeopleSearchQuery = parse_args("people_search", arguments)?;
        render("people_search", self.client.people().search(&query).await)
    }
}

/// Tool to reveal a person's email addresses
pub struct PersonEmailTool {
    client: ApolloClient,
}

impl PersonEmailTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PersonEmailArgs {
    #[serde(default)]
    apollo_id: String,
}

#[async_trait::async_trait]
impl Tool for PersonEmailTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_person_email".to_string(),
            description: "Get email address for a person using their Apollo ID".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "apollo_id": json_schema_string("Apollo.io person ID")
                }),
                vec!["apollo_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: PersonEmailArgs = parse_args("get_person_email", arguments)?;
        render(
            "get_person_email",
            self.client.people().email(&args.apollo_id).await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{test_client, unreachable_client};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_person_email() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/api/v1/mixed_people/add_to_my_prospects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contacts": [{"email": "a@b.com"}, {"email": "c@d.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = PersonEmailTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"apollo_id": "X"}))
            .await
            .unwrap();

        let emails: Vec<String> = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(emails, vec!["a@b.com", "c@d.com"]);
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_people_enrichment_forwards_arguments() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/people/match"))
            .and(body_json(serde_json::json!({
                "email": "tim@apollo.io",
                "reveal_personal_emails": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "person": {"id": "p1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = PeopleEnrichmentTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({
                "email": "tim@apollo.io",
                "reveal_personal_emails": true
            }))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(body["person"]["id"], "p1");
    }

    #[tokio::test]
    async fn test_network_error_renders_null() {
        let tool = PeopleSearchTool::new(unreachable_client());
        let result = tool.execute(serde_json::json!({})).await.unwrap();

        assert_eq!(result.content[0].as_text(), "null");
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_missing_apollo_id_renders_null() {
        let tool = PersonEmailTool::new(unreachable_client());
        let result = tool.execute(serde_json::Value::Null).await.unwrap();
        assert_eq!(result.content[0].as_text(), "null");
    }

    #[tokio::test]
    async fn test_malformed_arguments_error() {
        let tool = PeopleSearchTool::new(unreachable_client());
        let err = tool
            .execute(serde_json::json!({"person_titles": 5}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("people_search"));
    }
}
