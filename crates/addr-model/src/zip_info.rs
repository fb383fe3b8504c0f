use serde::{Deserialize, Serialize};

/// One row of the ZIP reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipInfo {
    pub zip: String,
    pub city: String,
    pub state_id: String,
    pub state_name: String,
    pub county_name: String,
}
