// Employees-of-company tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, parse_args, render, Tool};
use anyhow::Result;
use apollo_io_sdk::{ApolloClient, EmployeesOfCompanyQuery};

/// Tool to list the employees of a company
pub struct EmployeesOfCompanyTool {
    client: ApolloClient,
}

impl EmployeesOfCompanyTool {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for EmployeesOfCompanyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "employees_of_company".to_string(),
            description:
                "Find employees of a company using company name or website/LinkedIn URL"
                    .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "company": json_schema_string("Company name"),
                    "website_url": json_schema_string("Company website URL"),
                    "linkedin_url": json_schema_string("Company LinkedIn URL"),
                    "person_seniorities": json_schema_string("Comma-separated seniorities or titles to filter by"),
                    "contact_email_status": json_schema_string("Comma-separated email statuses to filter by")
                }),
                vec!["company"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let query: EmployeesOfCompanyQuery = parse_args("employees_of_company", arguments)?;
        render(
            "employees_of_company",
            self.client.employees().of_company(&query).await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_client;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_employees_first_organization() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/mixed_companies/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organizations": [{"id": "1", "name": "Acme"}, {"id": "2", "name": "Acme Labs"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/mixed_people/search"))
            .and(body_json(serde_json::json!({
                "organization_ids": ["1"],
                "page": 1,
                "limit": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "people": [{"id": "p1", "name": "Ada"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = EmployeesOfCompanyTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"company": "Acme"}))
            .await
            .unwrap();

        let people: serde_json::Value = serde_json::from_str(result.content[0].as_text()).unwrap();
        assert_eq!(people, serde_json::json!([{"id": "p1", "name": "Ada"}]));
    }

    #[tokio::test]
    async fn test_empty_company_renders_null_without_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = EmployeesOfCompanyTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"company": ""}))
            .await
            .unwrap();

        assert_eq!(result.content[0].as_text(), "null");
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_no_organizations_renders_null() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/mixed_companies/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organizations": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = EmployeesOfCompanyTool::new(test_client(&server));
        let result = tool
            .execute(serde_json::json!({"company": "Nobody Inc"}))
            .await
            .unwrap();

        assert_eq!(result.content[0].as_text(), "null");
    }
}
