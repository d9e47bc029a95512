use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Sales classification. Declaration order is the order entries are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Product,
    Service,
    Misc,
    Freight,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Product => "Product",
            Category::Service => "Service",
            Category::Misc => "Misc",
            Category::Freight => "Freight",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a product code to `Product` or `Service`.
///
/// Codes are compared after trimming and upper-casing. Anything not in the
/// service set, including a missing code, is a `Product`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    service_codes: BTreeSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(["SV"])
    }
}

impl Classifier {
    pub fn new<I, S>(service_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let service_codes = service_codes
            .into_iter()
            .map(|code| normalize(code.as_ref()))
            .filter(|code| !code.is_empty())
            .collect();
        Self { service_codes }
    }

    pub fn classify(&self, product_code: Option<&str>) -> Category {
        let code = product_code.map(normalize).unwrap_or_default();
        if !code.is_empty() && self.service_codes.contains(&code) {
            Category::Service
        } else {
            Category::Product
        }
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_code_is_product() {
        let c = Classifier::default();
        assert_eq!(c.classify(None), Category::Product);
        assert_eq!(c.classify(Some("")), Category::Product);
        assert_eq!(c.classify(Some("   ")), Category::Product);
    }

    #[test]
    fn service_match_ignores_case_and_padding() {
        let c = Classifier::default();
        assert_eq!(c.classify(Some("sv")), Category::Service);
        assert_eq!(c.classify(Some(" SV ")), Category::Service);
    }

    #[test]
    fn unknown_code_is_product() {
        let c = Classifier::default();
        assert_eq!(c.classify(Some("widget")), Category::Product);
        assert_eq!(c.classify(Some("SVC")), Category::Product);
    }

    #[test]
    fn custom_service_set_is_normalized() {
        let c = Classifier::new(["labor ", "Sv", ""]);
        assert_eq!(c.classify(Some("LABOR")), Category::Service);
        assert_eq!(c.classify(Some("sv")), Category::Service);
        assert_eq!(c.classify(Some("")), Category::Product);
    }

    #[test]
    fn serializes_with_display_names() {
        assert_eq!(
            serde_json::to_value(Category::Freight).unwrap(),
            serde_json::json!("Freight")
        );
        assert_eq!(Category::Misc.to_string(), "Misc");
    }
}
