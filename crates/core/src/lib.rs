pub mod aggregate;
pub mod domain;
pub mod ido;
pub mod report;

pub mod config {
    use anyhow::Context;
    use std::fmt;
    use std::time::Duration;

    use crate::ido::RecordCap;

    const DEFAULT_IDO_BASE_URL: &str = "http://localhost/IDORequestService/ido";
    const DEFAULT_IDO_CONFIG: &str = "DEFAULT";
    const DEFAULT_ORDER_COLLECTION: &str = "SLCoitems";
    const DEFAULT_INVOICE_COLLECTION: &str = "SLArinvds";
    const DEFAULT_SERVICE_PRODUCT_CODES: &str = "SV";

    /// Opaque upstream credential. Never printed, only handed to the HTTP layer.
    #[derive(Clone, PartialEq, Eq)]
    pub struct Credential(String);

    impl Credential {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn expose(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Debug for Credential {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("Credential(<redacted>)")
        }
    }

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub ido_base_url: String,
        pub ido_token: Option<Credential>,
        pub ido_config: String,
        pub ido_record_cap: RecordCap,
        pub ido_timeout: Option<Duration>,
        pub order_collection: String,
        pub invoice_collection: String,
        pub service_product_codes: Vec<String>,
        pub sentry_dsn: Option<String>,
        pub static_dir: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup. Blank values count as unset.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

            let ido_record_cap = match get("IDO_RECORD_CAP") {
                Some(v) => v
                    .trim()
                    .parse::<u32>()
                    .map(RecordCap::from_count)
                    .with_context(|| format!("IDO_RECORD_CAP must be a non-negative integer (got {v})"))?,
                None => RecordCap::Unbounded,
            };

            let ido_timeout = match get("IDO_TIMEOUT_SECS") {
                Some(v) => Some(Duration::from_secs(
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("IDO_TIMEOUT_SECS must be an integer (got {v})"))?,
                )),
                None => None,
            };

            let service_product_codes = get("SERVICE_PRODUCT_CODES")
                .unwrap_or_else(|| DEFAULT_SERVICE_PRODUCT_CODES.to_string())
                .split(',')
                .map(|code| code.trim().to_uppercase())
                .filter(|code| !code.is_empty())
                .collect();

            Ok(Self {
                ido_base_url: get("IDO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_IDO_BASE_URL.to_string()),
                ido_token: get("IDO_TOKEN").map(Credential::new),
                ido_config: get("IDO_CONFIG").unwrap_or_else(|| DEFAULT_IDO_CONFIG.to_string()),
                ido_record_cap,
                ido_timeout,
                order_collection: get("ORDER_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_ORDER_COLLECTION.to_string()),
                invoice_collection: get("INVOICE_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_INVOICE_COLLECTION.to_string()),
                service_product_codes,
                sentry_dsn: get("SENTRY_DSN"),
                static_dir: get("STATIC_DIR"),
            })
        }

        pub fn require_ido_token(&self) -> anyhow::Result<&Credential> {
            self.ido_token.as_ref().context("IDO_TOKEN is required")
        }
    }

}
