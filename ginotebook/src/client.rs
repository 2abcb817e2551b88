//! GI Notebook REST client.
//!
//! Each `get_*` method issues one GET against the service and follows every
//! resource URL embedded in the response, depth-first and one request at a
//! time, so the returned value is a fully resolved subtree. Nothing is
//! cached: fetching the same id twice re-issues every request. The typed
//! fetch chain (scenario -> instance -> template -> {type, element ->
//! {stratum, soil}}) never revisits a resource kind, so resolution always
//! terminates.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::NotebookError;
use crate::models::{
    Element, GiType, Instance, Scenario, SoilType, StratumType, Template,
};

pub const DEFAULT_HOSTNAME: &str = "gidesigner.renci.org";
pub const DEFAULT_API_ROOT: &str = "ginotebook/api";

const EP_SCENARIOS: &str = "gi_scenarios";
const EP_INSTANCES: &str = "gi_instances";
const EP_TEMPLATES: &str = "gi_templates";
const EP_TYPES: &str = "gi_types";
const EP_ELEMENTS: &str = "gi_elements";
const EP_STRATUM_TYPES: &str = "rhessys_stratum_types";
const EP_SOIL_TYPES: &str = "rhessys_soil_types";

/// Connection settings for [`NotebookClient`].
#[derive(Debug, Clone)]
pub struct NotebookConfig {
    pub hostname: String,
    pub api_root: String,
    /// Validated against `[0, 65535]` at client construction.
    pub port: Option<i64>,
    pub use_https: bool,
    /// When false, the transport accepts invalid server certificates.
    pub verify: bool,
    /// Sent as `Authorization: Token {token}` on every request when present.
    pub auth_token: Option<String>,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
            port: None,
            use_https: true,
            verify: true,
            auth_token: None,
        }
    }
}

impl NotebookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_port(mut self, port: i64) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Identifies a remote resource either by collection id or by full URL.
///
/// Id refs resolve against the fixed endpoint for the resource kind; URL
/// refs are used verbatim, which is how cross-references embedded in other
/// resources' JSON are followed.
#[derive(Debug, Clone)]
pub enum ResourceRef {
    Id(u64),
    Url(String),
}

impl From<u64> for ResourceRef {
    fn from(id: u64) -> Self {
        ResourceRef::Id(id)
    }
}

impl From<&str> for ResourceRef {
    fn from(url: &str) -> Self {
        ResourceRef::Url(url.to_string())
    }
}

impl From<String> for ResourceRef {
    fn from(url: String) -> Self {
        ResourceRef::Url(url)
    }
}

// Wire shapes as the REST API serves them. Related resources appear as URLs
// here and are resolved into full records by the client.

#[derive(Deserialize)]
struct ScenarioWire {
    id: u64,
    url: String,
    name: String,
    description: String,
    immutable: bool,
    watershed: String,
    giinstances: Vec<String>,
}

#[derive(Deserialize)]
struct InstanceWire {
    id: u64,
    url: String,
    placement_poly: Value,
    template: String,
}

#[derive(Deserialize)]
struct TemplateWire {
    id: u64,
    url: String,
    name: String,
    gi_type: String,
    model_3d: String,
    model_planview: String,
    gi_elements: Vec<String>,
}

#[derive(Deserialize)]
struct TypeWire {
    name: String,
}

#[derive(Deserialize)]
struct ElementWire {
    id: u64,
    url: String,
    name: String,
    model_3d: String,
    model_planview: String,
    soil_depth: f64,
    ponding_depth: f64,
    major_axis: f64,
    minor_axis: f64,
    stratum_type: Option<String>,
    soil_type: Option<String>,
}

/// Read-only client for the GI Notebook REST API.
#[derive(Debug)]
pub struct NotebookClient {
    base_url: String,
    http: reqwest::Client,
    auth_header: Option<HeaderValue>,
}

impl NotebookClient {
    /// Build a client from `config`. The base URL is assembled once here and
    /// never changes afterwards.
    pub fn new(config: NotebookConfig) -> Result<Self, NotebookError> {
        if let Some(port) = config.port {
            if !(0..=65_535).contains(&port) {
                return Err(NotebookError::IllegalPort(port));
            }
        }
        let scheme = if config.use_https { "https" } else { "http" };
        let base_url = match config.port {
            Some(port) => format!("{}://{}:{}/{}", scheme, config.hostname, port, config.api_root),
            None => format!("{}://{}/{}", scheme, config.hostname, config.api_root),
        };
        let auth_header = match &config.auth_token {
            Some(token) => Some(
                HeaderValue::from_str(&format!("Token {token}"))
                    .map_err(|_| NotebookError::InvalidAuthToken)?,
            ),
            None => None,
        };
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify)
            .build()?;
        Ok(Self {
            base_url,
            http,
            auth_header,
        })
    }

    fn resource_url(&self, endpoint: &str, rref: &ResourceRef) -> String {
        match rref {
            ResourceRef::Id(id) => format!("{}/{}/{}/", self.base_url, endpoint, id),
            ResourceRef::Url(url) => url.clone(),
        }
    }

    /// Merge the configured auth header into caller-supplied headers. The
    /// credential is inserted last so it wins on key collision.
    fn merged_headers(&self, mut headers: HeaderMap) -> HeaderMap {
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NotebookError> {
        self.get_json_with_headers(url, HeaderMap::new()).await
    }

    async fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<T, NotebookError> {
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .headers(self.merged_headers(headers))
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(NotebookError::Http {
                url: url.to_string(),
                method: Method::GET,
                status,
                params: None,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|source| NotebookError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch a scenario and resolve its full instance subtrees, attaching
    /// each in the order the service lists them.
    pub async fn get_scenario(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<Scenario, NotebookError> {
        let url = self.resource_url(EP_SCENARIOS, &rref.into());
        let raw: ScenarioWire = self.get_json(&url).await?;
        let mut scenario = Scenario {
            id: raw.id,
            url: raw.url,
            name: raw.name,
            description: raw.description,
            immutable: raw.immutable,
            watershed_url: raw.watershed,
            instances: Vec::new(),
        };
        for instance_url in raw.giinstances {
            let instance = self.get_instance(instance_url).await?;
            scenario.add_instance(instance);
        }
        tracing::debug!(
            id = scenario.id,
            instances = scenario.instances.len(),
            "resolved scenario"
        );
        Ok(scenario)
    }

    /// Fetch an instance and its template subtree. The scenario
    /// back-reference is left unset; attachment is the owning scenario's job.
    pub async fn get_instance(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<Instance, NotebookError> {
        let url = self.resource_url(EP_INSTANCES, &rref.into());
        let raw: InstanceWire = self.get_json(&url).await?;
        let template = self.get_template(raw.template).await?;
        Ok(Instance {
            id: raw.id,
            url: raw.url,
            placement_poly: raw.placement_poly,
            template,
            scenario: None,
        })
    }

    /// Fetch a template, resolve its GI type, then every element in the
    /// order the service lists them.
    pub async fn get_template(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<Template, NotebookError> {
        let url = self.resource_url(EP_TEMPLATES, &rref.into());
        let raw: TemplateWire = self.get_json(&url).await?;
        let type_name = self.get_type(raw.gi_type.as_str()).await?;
        let gi_type = GiType::from_name(&type_name).ok_or_else(|| NotebookError::UnknownGiType {
            url: raw.gi_type.clone(),
            name: type_name.clone(),
        })?;
        let mut template = Template {
            id: raw.id,
            url: raw.url,
            name: raw.name,
            gi_type,
            model_3d_url: raw.model_3d,
            model_planview_url: raw.model_planview,
            elements: Vec::new(),
        };
        for element_url in raw.gi_elements {
            let element = self.get_element(element_url).await?;
            template.add_element(element);
        }
        Ok(template)
    }

    /// Fetch a GI type and return its bare name. The one endpoint that does
    /// not build a record.
    pub async fn get_type(&self, rref: impl Into<ResourceRef>) -> Result<String, NotebookError> {
        let url = self.resource_url(EP_TYPES, &rref.into());
        let raw: TypeWire = self.get_json(&url).await?;
        Ok(raw.name)
    }

    /// Fetch an element, resolving its stratum and soil default-type links
    /// only when they are present and non-null.
    pub async fn get_element(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<Element, NotebookError> {
        let url = self.resource_url(EP_ELEMENTS, &rref.into());
        let raw: ElementWire = self.get_json(&url).await?;
        let stratum_type = match raw.stratum_type {
            Some(stratum_url) => Some(self.get_stratum_type(stratum_url).await?),
            None => None,
        };
        let soil_type = match raw.soil_type {
            Some(soil_url) => Some(self.get_soil_type(soil_url).await?),
            None => None,
        };
        Ok(Element {
            id: raw.id,
            url: raw.url,
            name: raw.name,
            model_3d_url: raw.model_3d,
            model_planview_url: raw.model_planview,
            soil_depth: raw.soil_depth,
            ponding_depth: raw.ponding_depth,
            major_axis: raw.major_axis,
            minor_axis: raw.minor_axis,
            stratum_type,
            soil_type,
        })
    }

    pub async fn get_stratum_type(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<StratumType, NotebookError> {
        let url = self.resource_url(EP_STRATUM_TYPES, &rref.into());
        self.get_json(&url).await
    }

    pub async fn get_soil_type(
        &self,
        rref: impl Into<ResourceRef>,
    ) -> Result<SoilType, NotebookError> {
        let url = self.resource_url(EP_SOIL_TYPES, &rref.into());
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_without_port() {
        let client = NotebookClient::new(NotebookConfig::new()).unwrap();
        assert_eq!(
            client.base_url,
            "https://gidesigner.renci.org/ginotebook/api"
        );
    }

    #[test]
    fn base_url_with_port_and_plain_http() {
        let config = NotebookConfig::new()
            .with_hostname("localhost")
            .with_port(8000)
            .with_https(false);
        let client = NotebookClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/ginotebook/api");
    }

    #[test]
    fn port_bounds_are_inclusive() {
        for port in [0, 65_535] {
            assert!(NotebookClient::new(NotebookConfig::new().with_port(port)).is_ok());
        }
        for port in [-1, 65_536, i64::MAX] {
            let err = NotebookClient::new(NotebookConfig::new().with_port(port)).unwrap_err();
            assert!(matches!(err, NotebookError::IllegalPort(p) if p == port));
        }
    }

    #[test]
    fn resource_url_from_id_and_from_url() {
        let client = NotebookClient::new(NotebookConfig::new()).unwrap();
        assert_eq!(
            client.resource_url(EP_SCENARIOS, &ResourceRef::Id(42)),
            "https://gidesigner.renci.org/ginotebook/api/gi_scenarios/42/"
        );
        let explicit = "https://elsewhere.example/api/gi_scenarios/42/";
        assert_eq!(
            client.resource_url(EP_SCENARIOS, &ResourceRef::from(explicit)),
            explicit
        );
    }

    #[test]
    fn auth_header_wins_over_caller_header() {
        let client =
            NotebookClient::new(NotebookConfig::new().with_auth_token("sekrit")).unwrap();
        let mut supplied = HeaderMap::new();
        supplied.insert(AUTHORIZATION, HeaderValue::from_static("Token theirs"));
        supplied.insert("X-Extra", HeaderValue::from_static("kept"));
        let merged = client.merged_headers(supplied);
        assert_eq!(merged.get(AUTHORIZATION).unwrap(), "Token sekrit");
        assert_eq!(merged.get("X-Extra").unwrap(), "kept");
    }

    #[test]
    fn no_auth_header_when_token_absent() {
        let client = NotebookClient::new(NotebookConfig::new()).unwrap();
        let merged = client.merged_headers(HeaderMap::new());
        assert!(merged.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_token_is_a_construction_error() {
        let err = NotebookClient::new(NotebookConfig::new().with_auth_token("bad\ntoken"))
            .unwrap_err();
        assert!(matches!(err, NotebookError::InvalidAuthToken));
    }
}
