//! Employees lookup example.
//!
//! Resolves a company by name and LinkedIn page, lists its people and reveals
//! the email of the first one.
//!
//! Run with: cargo run --example employees -- "Apollo" https://www.linkedin.com/company/apolloio/

use apollo_io_sdk::{ApolloClient, ApolloResult, CommaList, EmployeesOfCompanyQuery};

#[tokio::main]
async fn main() -> ApolloResult<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let company = args.next().unwrap_or_else(|| "Apollo".to_string());
    let linkedin_url = args.next();

    let client = ApolloClient::from_env()?;

    let people = client
        .employees()
        .of_company(&EmployeesOfCompanyQuery {
            company,
            linkedin_url,
            person_seniorities: Some(CommaList::Joined("vp, director".to_string())),
            ..Default::default()
        })
        .await?;

    println!("Found {} people", people.len());
    for person in people.iter().take(10) {
        println!("  {} - {}", person["name"], person["title"]);
    }

    if let Some(id) = people.first().and_then(|p| p["id"].as_str()) {
        let emails = client.people().email(id).await?;
        println!("\nEmails for {}: {:?}", id, emails);
    }

    Ok(())
}
