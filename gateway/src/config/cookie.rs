use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct CookieConfig {
    pub name: String,
    pub max_age_seconds: i64,
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "udiData".to_string(),
            max_age_seconds: 5 * 60,
            domain: None,
        }
    }
}
