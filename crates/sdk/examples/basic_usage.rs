//! Basic SDK usage example.
//!
//! Enriches a person and a company, then runs a people and an organization
//! search. Reads the API key from `APOLLO_IO_API_KEY`.
//!
//! Run with: cargo run --example basic_usage

use apollo_io_sdk::{
    ApolloClient, ApolloResult, OrganizationEnrichmentQuery, OrganizationSearchQuery,
    PeopleEnrichmentQuery, PeopleSearchQuery,
};

#[tokio::main]
async fn main() -> ApolloResult<()> {
    tracing_subscriber::fmt::init();

    let client = ApolloClient::from_env()?;

    println!("Enriching person...");
    let person = client
        .people()
        .enrich(&PeopleEnrichmentQuery {
            first_name: Some("Tim".to_string()),
            last_name: Some("Zheng".to_string()),
            ..Default::default()
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&person)?);

    println!("\nEnriching organization...");
    let organization = client
        .organizations()
        .enrich(&OrganizationEnrichmentQuery {
            domain: Some("apollo.io".to_string()),
            ..Default::default()
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&organization)?);

    println!("\nSearching people...");
    let people = client
        .people()
        .search(&PeopleSearchQuery {
            q_organization_domains_list: Some(vec!["apollo.io".to_string()]),
            person_titles: Some(vec!["Marketing Manager".to_string()]),
            person_seniorities: Some(vec!["vp".to_string()]),
            ..Default::default()
        })
        .await?;
    let count = people["people"].as_array().map(Vec::len).unwrap_or(0);
    println!("Found {} people", count);

    println!("\nSearching organizations...");
    let organizations = client
        .organizations()
        .search(&OrganizationSearchQuery {
            organization_locations: Some(vec!["Japan".to_string(), "Ireland".to_string()]),
            ..Default::default()
        })
        .await?;
    for org in organizations["organizations"].as_array().into_iter().flatten().take(5) {
        println!("  {} ({})", org["name"], org["id"]);
    }

    Ok(())
}
