//! Store configuration.
//!
//! ```toml
//! [numbering]
//! kind = "year_scoped"   # global | year_scoped
//! prefix = "INV-"
//! width = 4
//! ```

use serde::{Deserialize, Serialize};

use bahi_core::NumberingScheme;

use crate::error::StoreResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The one numbering scheme of this deployment.
    #[serde(default)]
    pub numbering: NumberingScheme,
}

impl StoreConfig {
    pub fn with_numbering(numbering: NumberingScheme) -> Self {
        Self { numbering }
    }

    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}
