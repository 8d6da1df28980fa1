//! API endpoint groups.

pub mod employees;
pub mod organizations;
pub mod people;

pub use employees::{best_match, CommaList, EmployeesApi, EmployeesOfCompanyQuery, OrganizationSummary};
pub use organizations::{OrganizationEnrichmentQuery, OrganizationSearchQuery, OrganizationsApi};
pub use people::{PeopleApi, PeopleEnrichmentQuery, PeopleSearchQuery};
