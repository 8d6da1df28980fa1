//! Employees-of-company lookup: find the company, then list its people.

use crate::client::ApolloClient;
use crate::config::ApiBase;
use crate::error::{ApolloError, ApolloResult};
use crate::url_match::normalize_opt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

const PAGE: u32 = 1;
const LIMIT: u32 = 100;

/// Employees API.
pub struct EmployeesApi<'a> {
    client: &'a ApolloClient,
}

impl<'a> EmployeesApi<'a> {
    pub(crate) fn new(client: &'a ApolloClient) -> Self {
        Self { client }
    }

    /// Find employees of a company by name, narrowed by website or LinkedIn URL.
    ///
    /// Searches companies by name, picks the one whose LinkedIn page or website
    /// matches the given URLs (falling back to the first hit), then searches
    /// people in that organization. Returns the `people` list of the second
    /// search, empty when the field is missing.
    pub async fn of_company(&self, query: &EmployeesOfCompanyQuery) -> ApolloResult<Vec<Value>> {
        if query.company.is_empty() {
            return Err(ApolloError::InvalidInput(
                "Company name is required".to_string(),
            ));
        }

        let linkedin_url = normalize_opt(query.linkedin_url.as_deref());
        let website_url = normalize_opt(query.website_url.as_deref());

        let companies: Option<CompanySearchResponse> = self
            .client
            .http
            .post(
                ApiBase::Legacy,
                "mixed_companies/search",
                &CompanySearchRequest {
                    q_organization_name: &query.company,
                    page: PAGE,
                    limit: LIMIT,
                },
            )
            .await?;
        let organizations = companies
            .ok_or(ApolloError::EmptyResponse)?
            .organizations
            .unwrap_or_default();

        let organization = best_match(
            &organizations,
            linkedin_url.as_deref(),
            website_url.as_deref(),
        )
        .ok_or(ApolloError::NoOrganizations)?;

        let organization_id = organization
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ApolloError::MissingOrganizationId)?;

        info!(
            company = %query.company,
            organization_id = organization_id,
            candidates = organizations.len(),
            "Resolved company for employee search"
        );

        let request = PeopleSearchRequest {
            organization_ids: vec![organization_id.to_string()],
            page: PAGE,
            limit: LIMIT,
            person_titles: query.person_seniorities.as_ref().map(CommaList::items),
            contact_email_status_v2: query.contact_email_status.as_ref().map(CommaList::items),
        };

        let people: Option<PeopleSearchResponse> = self
            .client
            .http
            .post(ApiBase::Legacy, "mixed_people/search", &request)
            .await?;
        let people = people
            .ok_or(ApolloError::EmptyResponse)?
            .people
            .unwrap_or_default();

        debug!(organization_id = organization_id, count = people.len(), "Employees found");
        Ok(people)
    }
}

/// Input of the employees lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeesOfCompanyQuery {
    /// Company name to search for. Required.
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    /// Sent to the people search as `person_titles`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_seniorities: Option<CommaList>,
    /// Sent to the people search as `contact_email_status_v2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email_status: Option<CommaList>,
}

/// A filter given either as `"a, b"` or as `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommaList {
    Joined(String),
    List(Vec<String>),
}

impl CommaList {
    /// The individual entries, trimmed.
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::Joined(s) => s.split(',').map(|item| item.trim().to_string()).collect(),
            Self::List(items) => items.iter().map(|item| item.trim().to_string()).collect(),
        }
    }
}

/// The fields of a company search hit used for matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// Pick the organization to search employees in.
///
/// A LinkedIn match wins over a website match; without either, the first
/// result is used. `None` only when `organizations` is empty.
pub fn best_match<'o>(
    organizations: &'o [OrganizationSummary],
    linkedin_url: Option<&str>,
    website_url: Option<&str>,
) -> Option<&'o OrganizationSummary> {
    find_by(organizations, linkedin_url, |org| org.linkedin_url.as_deref())
        .or_else(|| find_by(organizations, website_url, |org| org.website_url.as_deref()))
        .or_else(|| organizations.first())
}

fn find_by<'o>(
    organizations: &'o [OrganizationSummary],
    wanted: Option<&str>,
    field: impl Fn(&OrganizationSummary) -> Option<&str>,
) -> Option<&'o OrganizationSummary> {
    let wanted = wanted?;
    organizations
        .iter()
        .find(|org| normalize_opt(field(org)).as_deref() == Some(wanted))
}

#[derive(Debug, Serialize)]
struct CompanySearchRequest<'a> {
    q_organization_name: &'a str,
    page: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct CompanySearchResponse {
    #[serde(default)]
    organizations: Option<Vec<OrganizationSummary>>,
}

#[derive(Debug, Serialize)]
struct PeopleSearchRequest {
    organization_ids: Vec<String>,
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_email_status_v2: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PeopleSearchResponse {
    #[serde(default)]
    people: Option<Vec<Value>>,
}
