//! People API endpoints.

use crate::client::ApolloClient;
use crate::config::ApiBase;
use crate::error::{ApolloError, ApolloResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// People API for enrichment, search and email reveal.
pub struct PeopleApi<'a> {
    client: &'a ApolloClient,
}

impl<'a> PeopleApi<'a> {
    pub(crate) fn new(client: &'a ApolloClient) -> Self {
        Self { client }
    }

    /// Enrich data for one person.
    ///
    /// <https://docs.apollo.io/reference/people-enrichment>
    pub async fn enrich(&self, query: &PeopleEnrichmentQuery) -> ApolloResult<Value> {
        tracing::debug!(query = ?query, "people enrichment");
        self.client.http.post(ApiBase::Api, "people/match", query).await
    }

    /// Search people across the Apollo database.
    ///
    /// <https://docs.apollo.io/reference/people-search>
    pub async fn search(&self, query: &PeopleSearchQuery) -> ApolloResult<Value> {
        self.client
            .http
            .post(ApiBase::Api, "mixed_people/search", query)
            .await
    }

    /// Reveal the email addresses of a person by adding them to prospects.
    pub async fn email(&self, apollo_id: &str) -> ApolloResult<Vec<String>> {
        if apollo_id.trim().is_empty() {
            return Err(ApolloError::InvalidInput("Apollo ID is required".to_string()));
        }

        let request = AddToProspectsRequest {
            entity_ids: vec![apollo_id.to_string()],
            analytics_context: "Searcher: Individual Add Button",
            skip_fetching_people: true,
            cta_name: "Access email",
            cache_key: chrono::Utc::now().timestamp_millis(),
        };

        let response: Option<AddToProspectsResponse> = self
            .client
            .http
            .post(ApiBase::App, "mixed_people/add_to_my_prospects", &request)
            .await?;
        let response = response.ok_or(ApolloError::EmptyResponse)?;

        Ok(response.emails())
    }
}

/// Fields recognized by the people enrichment endpoint.
///
/// Anything in `extra` is sent along unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleEnrichmentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for the mixed people search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleSearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_organization_domains_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_titles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_seniorities: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct AddToProspectsRequest {
    entity_ids: Vec<String>,
    analytics_context: &'static str,
    skip_fetching_people: bool,
    cta_name: &'static str,
    #[serde(rename = "cacheKey")]
    cache_key: i64,
}

#[derive(Debug, Deserialize)]
struct AddToProspectsResponse {
    #[serde(default)]
    contacts: Option<Vec<Value>>,
}

impl AddToProspectsResponse {
    fn emails(self) -> Vec<String> {
        self.contacts
            .unwrap_or_default()
            .into_iter()
            .filter_map(|contact| match contact.get("email") {
                Some(Value::String(email)) => Some(email.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_client, unreachable_client};
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_enrichment_query_keeps_unknown_keys() {
        let query: PeopleEnrichmentQuery = serde_json::from_value(serde_json::json!({
            "first_name": "Tim",
            "reveal_personal_emails": true
        }))
        .unwrap();

        assert_eq!(query.first_name.as_deref(), Some("Tim"));
        assert_eq!(query.extra["reveal_personal_emails"], true);

        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"first_name": "Tim", "reveal_personal_emails": true})
        );
    }

    #[tokio::test]
    async fn test_enrich_posts_to_match() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/people/match"))
            .and(body_json(serde_json::json!({"first_name": "Tim", "last_name": "Zheng"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"person": {"id": "p1", "name": "Tim Zheng"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = PeopleEnrichmentQuery {
            first_name: Some("Tim".to_string()),
            last_name: Some("Zheng".to_string()),
            ..Default::default()
        };

        let result = client.people().enrich(&query).await.unwrap();
        assert_eq!(result["person"]["id"], "p1");
    }

    #[tokio::test]
    async fn test_search_posts_to_mixed_people() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mixed_people/search"))
            .and(body_json(serde_json::json!({
                "person_titles": ["Marketing Manager"],
                "person_seniorities": ["vp"],
                "q_organization_domains_list": ["apollo.io"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"people": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let query = PeopleSearchQuery {
            q_organization_domains_list: Some(vec!["apollo.io".to_string()]),
            person_titles: Some(vec!["Marketing Manager".to_string()]),
            person_seniorities: Some(vec!["vp".to_string()]),
            extra: Map::new(),
        };

        let result = client.people().search(&query).await.unwrap();
        assert_eq!(result["people"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_search_failure_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/mixed_people/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .people()
            .search(&PeopleSearchQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_email_extracts_contacts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/api/v1/mixed_people/add_to_my_prospects"))
            .and(body_partial_json(serde_json::json!({
                "entity_ids": ["X"],
                "analytics_context": "Searcher: Individual Add Button",
                "skip_fetching_people": true,
                "cta_name": "Access email"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contacts": [{"email": "a@b.com"}, {"email": "c@d.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let emails = client.people().email("X").await.unwrap();
        assert_eq!(emails, vec!["a@b.com".to_string(), "c@d.com".to_string()]);
    }

    #[tokio::test]
    async fn test_email_sends_cache_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/api/v1/mixed_people/add_to_my_prospects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let emails = client.people().email("X").await.unwrap();
        assert!(emails.is_empty());

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["cacheKey"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_email_skips_contacts_without_email() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/api/v1/mixed_people/add_to_my_prospects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contacts": [{"email": null}, {"id": "c2"}, {"email": "x@y.io"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let emails = client.people().email("X").await.unwrap();
        assert_eq!(emails, vec!["x@y.io".to_string()]);
    }

    #[tokio::test]
    async fn test_email_null_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/api/v1/mixed_people/add_to_my_prospects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.people().email("X").await.unwrap_err();
        assert!(matches!(err, ApolloError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_email_requires_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.people().email("").await.unwrap_err();
        assert!(matches!(err, ApolloError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_network_error_is_returned() {
        let client = unreachable_client();

        let err = client
            .people()
            .enrich(&PeopleEnrichmentQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApolloError::Http(_)));
        assert!(client.people().email("X").await.is_err());
    }
}
