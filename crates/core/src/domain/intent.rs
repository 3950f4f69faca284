use serde::{Deserialize, Serialize};

/// Structured search criteria extracted from a free-text query.
///
/// Every field defaults to absent: a completion that omits keys still
/// decodes, and nothing here may carry criteria the user never stated.
/// Constructed fresh per query and discarded once the query completes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_age: Option<i64>,
    #[serde(default)]
    pub max_age: Option<i64>,
    #[serde(default)]
    pub fields_requested: Vec<String>,
    #[serde(default)]
    pub is_all_info: bool,
}
