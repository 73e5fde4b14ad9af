//! Building: the physical place reviews refer to.
//!
//! Buildings are managed elsewhere; the aggregation layer only reads them to
//! decorate filter results.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
  #[serde(rename = "GID")]
  pub gid:           String,
  #[serde(rename = "buildingName")]
  pub building_name: String,
  /// Free-text venue category, e.g. "Restaurant".
  pub category:      Option<String>,
  pub address:       Option<String>,
  pub latitude:      Option<f64>,
  pub longitude:     Option<f64>,
}
