//! Organizations API endpoints.

use crate::client::ApolloClient;
use crate::config::ApiBase;
use crate::error::{ApolloError, ApolloResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Organizations API for enrichment, search and job postings.
pub struct OrganizationsApi<'a> {
    client: &'a ApolloClient,
}

impl<'a> OrganizationsApi<'a> {
    pub(crate) fn new(client: &'a ApolloClient) -> Self {
        Self { client }
    }

    /// Enrich data for one company. The query is sent as URL parameters.
    ///
    /// <https://docs.apollo.io/reference/organization-enrichment>
    pub async fn enrich(&self, query: &OrganizationEnrichmentQuery) -> ApolloResult<Value> {
        self.client
            .http
            .get_with_query(ApiBase::Api, "organizations/enrich", query)
            .await
    }

    /// Search organizations across the Apollo database.
    ///
    /// <https://docs.apollo.io/reference/organization-search>
    pub async fn search(&self, query: &OrganizationSearchQuery) -> ApolloResult<Value> {
        self.client
            .http
            .post(ApiBase::Api, "mixed_companies/search", query)
            .await
    }

    /// List the active job postings of an organization.
    ///
    /// <https://docs.apollo.io/reference/organization-jobs-postings>
    pub async fn job_postings(&self, organization_id: &str) -> ApolloResult<Value> {
        if organization_id.trim().is_empty() {
            return Err(ApolloError::InvalidInput(
                "Organization ID is required".to_string(),
            ));
        }
        if matches!(organization_id, "." | "..") {
            return Err(ApolloError::InvalidInput(format!(
                "Invalid organization ID: {}",
                organization_id
            )));
        }

        self.client
            .http
            .get_segments(
                ApiBase::Api,
                &["organizations", organization_id, "job_postings"],
            )
            .await
    }
}

/// Fields recognized by the organization enrichment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationEnrichmentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for the mixed companies search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationSearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_organization_domains_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_locations: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_client, unreachable_client};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_enrich_uses_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/enrich"))
            .and(query_param("domain", "apollo.io"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organization": {"id": "o1", "name": "Apollo"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = OrganizationEnrichmentQuery {
            domain: Some("apollo.io".to_string()),
            ..Default::default()
        };

        let result = client.organizations().enrich(&query).await.unwrap();
        assert_eq!(result["organization"]["id"], "o1");
    }

    #[tokio::test]
    async fn test_search_forwards_extra_keys() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mixed_companies/search"))
            .and(body_json(serde_json::json!({
                "organization_locations": ["Japan", "Ireland"],
                "page": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organizations": [{"id": "o1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query: OrganizationSearchQuery = serde_json::from_value(serde_json::json!({
            "organization_locations": ["Japan", "Ireland"],
            "page": 2
        }))
        .unwrap();

        let result = client.organizations().search(&query).await.unwrap();
        assert_eq!(result["organizations"][0]["id"], "o1");
    }

    #[tokio::test]
    async fn test_job_postings_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/5e60b6381c85b4008c83/job_postings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organization_job_postings": [{"title": "Engineer"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client
            .organizations()
            .job_postings("5e60b6381c85b4008c83")
            .await
            .unwrap();
        assert_eq!(result["organization_job_postings"][0]["title"], "Engineer");
    }

    #[tokio::test]
    async fn test_job_postings_encodes_id_as_one_segment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/a%2Fb%3Fc/job_postings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organization_job_postings": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.organizations().job_postings("a/b?c").await.unwrap();
        assert_eq!(result["organization_job_postings"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_job_postings_rejects_dot_segments() {
        let client = unreachable_client();
        for id in [".", ".."] {
            let err = client.organizations().job_postings(id).await.unwrap_err();
            assert!(matches!(err, ApolloError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_job_postings_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/missing/job_postings"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.organizations().job_postings("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_job_postings_requires_id() {
        let client = unreachable_client();
        let err = client.organizations().job_postings(" ").await.unwrap_err();
        assert!(matches!(err, ApolloError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_network_error_is_returned() {
        let client = unreachable_client();

        let err = client
            .organizations()
            .search(&OrganizationSearchQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApolloError::Http(_)));
        assert!(client
            .organizations()
            .enrich(&OrganizationEnrichmentQuery::default())
            .await
            .is_err());
    }
}
