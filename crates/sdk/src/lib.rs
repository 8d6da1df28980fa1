//! # Apollo.io SDK
//!
//! Async client for the Apollo.io people and organization API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apollo_io_sdk::{ApolloClient, ApolloResult, PeopleEnrichmentQuery};
//!
//! #[tokio::main]
//! async fn main() -> ApolloResult<()> {
//!     let client = ApolloClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let query = PeopleEnrichmentQuery {
//!         first_name: Some("Tim".to_string()),
//!         last_name: Some("Zheng".to_string()),
//!         ..Default::default()
//!     };
//!     let person = client.people().enrich(&query).await?;
//!     println!("{}", serde_json::to_string_pretty(&person)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Employees of a company
//!
//! ```rust,no_run
//! use apollo_io_sdk::{ApolloClient, EmployeesOfCompanyQuery};
//!
//! # async fn example() -> apollo_io_sdk::ApolloResult<()> {
//! let client = ApolloClient::from_env()?;
//!
//! let people = client
//!     .employees()
//!     .of_company(&EmployeesOfCompanyQuery {
//!         company: "Apollo".to_string(),
//!         website_url: Some("https://www.apollo.io/".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Found {} people", people.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod url_match;

pub use api::{
    CommaList, EmployeesOfCompanyQuery, OrganizationEnrichmentQuery, OrganizationSearchQuery,
    OrganizationSummary, PeopleEnrichmentQuery, PeopleSearchQuery,
};
pub use client::{ApolloClient, ApolloClientBuilder};
pub use config::{ApiBase, AuthScheme, ClientConfig, API_KEY_ENV};
pub use error::{ApolloError, ApolloResult};
pub use url_match::normalize_url;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ApolloClient;
    use wiremock::MockServer;

    /// Client with every base URL pointed at the mock server.
    pub fn test_client(server: &MockServer) -> ApolloClient {
        ApolloClient::builder()
            .api_key("test-key")
            .host(server.uri())
            .build()
            .unwrap()
    }

    /// Client whose requests fail to connect.
    pub fn unreachable_client() -> ApolloClient {
        ApolloClient::builder()
            .api_key("test-key")
            .host("http://127.0.0.1:9")
            .build()
            .unwrap()
    }
}
