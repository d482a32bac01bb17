//! Company directory endpoints: CRUD, metadata, and global search.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiResult};

/// A charging-network company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, rename = "officialLink")]
    pub official_link: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub bookings_count: i64,
}

impl Company {
    /// Preferred external link: the website, else the legacy official link.
    pub fn link(&self) -> Option<&str> {
        self.website.as_deref().or(self.official_link.as_deref())
    }
}

/// Fields accepted when creating or updating a company.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Listing parameters; the server orders results by views descending.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyQuery {
    pub skip: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 10,
            country: None,
            category: None,
            search: None,
        }
    }
}

/// A station owned by a company, as listed under that company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStation {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub charging_type: Option<String>,
    #[serde(default)]
    pub available_slots: u32,
}

/// A company's stations with the owning company's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStations {
    pub company_id: i64,
    pub company_name: String,
    pub station_count: u32,
    pub stations: Vec<CompanyStation>,
}

#[derive(Debug, Deserialize)]
struct CountryList {
    countries: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    categories: Vec<String>,
}

/// A global-search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub views: i64,
}

/// Result of a global company search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSearch {
    pub query: String,
    pub results_count: u32,
    pub results: Vec<SearchHit>,
}

impl ApiClient {
    /// Lists companies with paging and optional country/category/search
    /// filters.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_companies(&self, query: &CompanyQuery) -> ApiResult<Vec<Company>> {
        self.get_json_query("/companies/", query, "Failed to load companies")
            .await
    }

    /// Fetches one company by id.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn company(&self, id: i64) -> ApiResult<Company> {
        self.get_json(&format!("/companies/{id}"), "Failed to load company")
            .await
    }

    /// Creates a company; duplicate names are rejected with 409.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn create_company(&self, draft: &CompanyDraft) -> ApiResult<Company> {
        self.post_json("/companies/", draft, "Failed to add company")
            .await
    }

    /// Replaces a company's details.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn update_company(&self, id: i64, draft: &CompanyDraft) -> ApiResult<Company> {
        self.put_json(&format!("/companies/{id}"), draft, "Failed to update company")
            .await
    }

    /// Deletes a company.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn delete_company(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/companies/{id}"), "Failed to delete company")
            .await
    }

    /// Lists the stations owned by a company.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn company_stations(&self, id: i64) -> ApiResult<CompanyStations> {
        self.get_json(
            &format!("/companies/{id}/stations"),
            "Failed to load company stations",
        )
        .await
    }

    /// Lists the countries that have at least one company.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn company_countries(&self) -> ApiResult<Vec<String>> {
        let list: CountryList = self
            .get_json("/companies/meta/countries", "Failed to load countries")
            .await?;
        Ok(list.countries)
    }

    /// Lists the known company categories.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn company_categories(&self) -> ApiResult<Vec<String>> {
        let list: CategoryList = self
            .get_json("/companies/meta/categories", "Failed to load categories")
            .await?;
        Ok(list.categories)
    }

    /// Searches companies across name, description, country, and category.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn search_companies(&self, q: &str) -> ApiResult<GlobalSearch> {
        self.get_json_query("/companies/search/global", &[("q", q)], "Search failed")
            .await
    }
}
