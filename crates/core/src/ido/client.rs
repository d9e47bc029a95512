use crate::config::Settings;
use crate::domain::record::RawRecord;
use crate::ido::error::IdoError;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::time::Instant;

const CONFIG_HEADER: &str = "X-Infor-MongooseConfig";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Upper bound on the number of records one load may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordCap {
    #[default]
    Unbounded,
    Limit(u32),
}

impl RecordCap {
    /// `0` means no cap, matching the IDO query convention.
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            RecordCap::Unbounded
        } else {
            RecordCap::Limit(count)
        }
    }

    fn query_value(self) -> String {
        match self {
            RecordCap::Unbounded => "0".to_string(),
            RecordCap::Limit(n) => n.to_string(),
        }
    }
}

/// One collection load: which IDO, which properties, optionally which rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub collection: String,
    pub properties: Vec<String>,
    pub filter: Option<String>,
}

impl LoadRequest {
    pub fn new<S: AsRef<str>>(collection: impl Into<String>, properties: &[S]) -> Self {
        Self {
            collection: collection.into(),
            properties: properties.iter().map(|p| p.as_ref().to_string()).collect(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the collection's `Items` in upstream order.
    async fn load_collection(&self, request: &LoadRequest) -> Result<Vec<RawRecord>, IdoError>;
}

#[derive(Debug, Clone)]
pub struct IdoClient {
    http: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    record_cap: RecordCap,
}

impl IdoClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let token = settings.require_ido_token()?;

        let mut auth = HeaderValue::from_str(token.expose())
            .context("IDO_TOKEN is not a valid header value")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            CONFIG_HEADER,
            HeaderValue::from_str(&settings.ido_config)
                .context("IDO_CONFIG is not a valid header value")?,
        );

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.ido_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build IDO http client")?;

        Ok(Self {
            http,
            base_url: settings.ido_base_url.clone(),
            headers,
            record_cap: settings.ido_record_cap,
        })
    }

    fn url(&self, collection: &str) -> String {
        format!("{}/load/{}", self.base_url.trim_end_matches('/'), collection)
    }

    fn query(&self, request: &LoadRequest) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(3);
        if !request.properties.is_empty() {
            query.push(("properties", request.properties.join(",")));
        }
        if let Some(filter) = &request.filter {
            query.push(("filter", filter.clone()));
        }
        query.push(("recordCap", self.record_cap.query_value()));
        query
    }
}

#[async_trait::async_trait]
impl RecordSource for IdoClient {
    async fn load_collection(&self, request: &LoadRequest) -> Result<Vec<RawRecord>, IdoError> {
        let started = Instant::now();

        let res = self
            .http
            .get(self.url(&request.collection))
            .headers(self.headers.clone())
            .query(&self.query(request))
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(IdoError::Status {
                status,
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let items = parse_load_response(&text)?;
        tracing::debug!(
            collection = %request.collection,
            items = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "IDO collection loaded"
        );
        Ok(items)
    }
}

fn parse_load_response(text: &str) -> Result<Vec<RawRecord>, IdoError> {
    let body = serde_json::from_str::<Value>(text)
        .map_err(|e| IdoError::Shape(format!("body is not valid JSON: {e}")))?;

    let Value::Object(mut body) = body else {
        return Err(IdoError::Shape("body is not a JSON object".to_string()));
    };

    if body.get("Success") == Some(&Value::Bool(false)) {
        let message = body
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string();
        return Err(IdoError::Rejected(message));
    }

    match body.remove("Items") {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(IdoError::Shape("Items is not an array".to_string())),
        None => Err(IdoError::Shape("Items is missing".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use serde_json::json;

    fn settings() -> Settings {
        let mut s = Settings::from_lookup(|_| None).unwrap();
        s.ido_base_url = "https://erp.example.com/IDORequestService/ido/".to_string();
        s.ido_token = Some(Credential::new("token-123"));
        s.ido_config = "ACME_TST".to_string();
        s
    }

    #[test]
    fn builds_load_url_and_query() {
        let client = IdoClient::from_settings(&settings()).unwrap();
        assert_eq!(
            client.url("SLCoitems"),
            "https://erp.example.com/IDORequestService/ido/load/SLCoitems"
        );

        let req = LoadRequest::new("SLCoitems", &["RecordDate", "ExtendedPrice"]);
        assert_eq!(
            client.query(&req),
            vec![
                ("properties", "RecordDate,ExtendedPrice".to_string()),
                ("recordCap", "0".to_string()),
            ]
        );
    }

    #[test]
    fn empty_projection_is_omitted_and_filter_is_forwarded() {
        let mut s = settings();
        s.ido_record_cap = RecordCap::Limit(25);
        let client = IdoClient::from_settings(&s).unwrap();

        let req = LoadRequest::new("SLArinvds", &[] as &[&str]).with_filter("InvNum > '100'");
        assert_eq!(
            client.query(&req),
            vec![
                ("filter", "InvNum > '100'".to_string()),
                ("recordCap", "25".to_string()),
            ]
        );
    }

    #[test]
    fn requires_token() {
        let mut s = settings();
        s.ido_token = None;
        assert!(IdoClient::from_settings(&s).is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let client = IdoClient::from_settings(&settings()).unwrap();
        assert!(!format!("{client:?}").contains("token-123"));
    }

    #[test]
    fn parse_returns_items_in_order() {
        let body = json!({
            "Items": [{"RecordDate": "2024-01-01"}, {"RecordDate": "2024-01-02"}],
            "Success": true,
            "Message": null,
        })
        .to_string();
        let items = parse_load_response(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["RecordDate"], "2024-01-02");
    }

    #[test]
    fn parse_flags_missing_items_as_shape_error() {
        let err = parse_load_response(r#"{"Success": true}"#).unwrap_err();
        assert!(err.is_shape());
        assert!(parse_load_response(r#"{"Items": {}}"#).unwrap_err().is_shape());
        assert!(parse_load_response("<html>").unwrap_err().is_shape());
        assert!(parse_load_response("[]").unwrap_err().is_shape());
    }

    #[test]
    fn parse_surfaces_upstream_rejection() {
        let err = parse_load_response(r#"{"Success": false, "Message": "Invalid token"}"#)
            .unwrap_err();
        assert!(matches!(err, IdoError::Rejected(ref m) if m == "Invalid token"));
    }
}
