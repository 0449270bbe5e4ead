//! GA4 Admin API client: account summaries and property configuration.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AuditResult;

use super::auth::AccessToken;
use super::property_resource;

const ADMIN_API_BASE: &str = "https://analyticsadmin.googleapis.com/v1beta";

/// Non-report resources the configuration checks read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResource {
    RetentionSettings,
    WebStreams,
    IosStreams,
    AndroidStreams,
}

impl AdminResource {
    /// Path segment under `properties/<id>/`.
    fn path(self) -> &'static str {
        match self {
            Self::RetentionSettings => "dataRetentionSettings",
            Self::WebStreams => "webDataStreams",
            Self::IosStreams => "iosAppDataStreams",
            Self::AndroidStreams => "androidAppDataStreams",
        }
    }

    /// Key of the collection array in the response, for stream resources.
    pub fn collection_key(self) -> Option<&'static str> {
        match self {
            Self::RetentionSettings => None,
            Self::WebStreams => Some("webDataStreams"),
            Self::IosStreams => Some("iosAppDataStreams"),
            Self::AndroidStreams => Some("androidAppDataStreams"),
        }
    }
}

/// Boundary seam for the Admin API; the configuration checks depend on this
/// trait only.
pub trait AdminFetcher {
    fn fetch_admin_resource(&self, property: &str, kind: AdminResource) -> AuditResult<Value>;
}

/// One GA4 property as listed for the signed-in user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    /// Resource name, `properties/<id>`.
    pub property: String,
    #[serde(default)]
    pub display_name: String,
}

/// One account with its properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub property_summaries: Vec<PropertySummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountSummariesResponse {
    #[serde(default)]
    account_summaries: Vec<AccountSummary>,
}

/// Blocking Admin API client.
pub struct AdminApiClient {
    http: reqwest::blocking::Client,
    token: AccessToken,
}

impl AdminApiClient {
    pub fn new(token: AccessToken) -> AuditResult<Self> {
        Ok(Self {
            http: super::http_client()?,
            token,
        })
    }

    /// Accounts and properties visible to the token's user.
    pub fn list_account_summaries(&self) -> AuditResult<Vec<AccountSummary>> {
        let endpoint = format!("{ADMIN_API_BASE}/accountSummaries");
        let body = super::get_json(&self.http, &endpoint, &self.token)?;
        let parsed: AccountSummariesResponse = serde_json::from_value(body).unwrap_or_default();
        Ok(parsed.account_summaries)
    }
}

impl AdminFetcher for AdminApiClient {
    fn fetch_admin_resource(&self, property: &str, kind: AdminResource) -> AuditResult<Value> {
        let endpoint = format!(
            "{ADMIN_API_BASE}/{}/{}",
            property_resource(property),
            kind.path()
        );
        super::get_json(&self.http, &endpoint, &self.token)
    }
}
