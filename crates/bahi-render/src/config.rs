//! # Render Configuration
//!
//! Seller profile, layout and money format used by the renderer.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BAHI_SELLER_NAME="MK INDUSTRIES"                                   │
//! │     BAHI_ROW_CAPACITY=24                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit --config path, or                                         │
//! │     ~/.config/bahi/bahi.toml (Linux)                                   │
//! │     ~/Library/Application Support/in.bahi.bahi/bahi.toml (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     24 rows, 132×66 character pages, ₹ with Indian grouping            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! slab_grouping = "hsn_and_rate"   # hsn_and_rate | rate_only
//!
//! [seller]
//! name = "MK INDUSTRIES"
//! gstin = "24AAACP1234C1Z5"
//! address = "Unit 28, Sardar Nagar Road, Jamnagar"
//!
//! [seller.bank]
//! bank_name = "Example Co-op Bank"
//! account_number = "0012345678901234"
//! ifsc = "EXMP0001234"
//!
//! [layout]
//! row_capacity = 24
//! page_width = 132
//! page_height = 66
//!
//! [money]
//! symbol = "₹"
//! grouping = "indian"   # indian | western
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use bahi_core::validation::validate_gstin;
use bahi_core::{MoneyFormat, SlabGrouping};

use crate::error::{RenderError, RenderResult};

/// Narrowest page that still fits every table column.
pub const MIN_PAGE_WIDTH: usize = 120;

/// Shortest page that fits the header, one row and the summary blocks.
pub const MIN_PAGE_HEIGHT: usize = 40;

/// Upper bound on the fixed table height.
pub const MAX_ROW_CAPACITY: usize = 200;

// =============================================================================
// Seller Profile
// =============================================================================

/// Bank account printed for payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    /// Kept as text: account numbers have leading zeros and exceed f64 precision.
    pub account_number: String,
    pub ifsc: String,
}

/// The issuing business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub gstin: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub bank: Option<BankDetails>,

    /// Caption under the signature space.
    #[serde(default = "default_signatory")]
    pub signatory: String,
}

fn default_signatory() -> String {
    "Authorized Signatory".to_string()
}

impl Default for SellerProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            gstin: None,
            address: None,
            bank: None,
            signatory: default_signatory(),
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Number of table rows, data plus filler.
    #[serde(default = "default_row_capacity")]
    pub row_capacity: usize,

    /// Characters per line of the paged document.
    #[serde(default = "default_page_width")]
    pub page_width: usize,

    /// Lines per page of the paged document.
    #[serde(default = "default_page_height")]
    pub page_height: usize,
}

fn default_row_capacity() -> usize {
    24
}

fn default_page_width() -> usize {
    132
}

fn default_page_height() -> usize {
    66
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_capacity: default_row_capacity(),
            page_width: default_page_width(),
            page_height: default_page_height(),
        }
    }
}

impl LayoutConfig {
    /// Checks the table and page geometry.
    pub fn validate(&self) -> RenderResult<()> {
        if self.row_capacity == 0 || self.row_capacity > MAX_ROW_CAPACITY {
            return Err(RenderError::Config(format!(
                "row_capacity must be between 1 and {}, got {}",
                MAX_ROW_CAPACITY, self.row_capacity
            )));
        }

        if self.page_width < MIN_PAGE_WIDTH {
            return Err(RenderError::Config(format!(
                "page_width must be at least {}, got {}",
                MIN_PAGE_WIDTH, self.page_width
            )));
        }

        if self.page_height < MIN_PAGE_HEIGHT {
            return Err(RenderError::Config(format!(
                "page_height must be at least {}, got {}",
                MIN_PAGE_HEIGHT, self.page_height
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Render Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub seller: SellerProfile,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub money: MoneyFormat,

    #[serde(default)]
    pub slab_grouping: SlabGrouping,
}

impl RenderConfig {
    /// Loads configuration from file and environment, then validates it.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. `BAHI_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> RenderResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading render config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document without touching the environment.
    pub fn from_toml(contents: &str) -> RenderResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> RenderResult<()> {
        self.layout.validate()?;

        if let Some(gstin) = &self.seller.gstin {
            validate_gstin(gstin).map_err(|e| RenderError::Config(format!("seller {}", e)))?;
        }

        Ok(())
    }

    /// Applies `BAHI_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("BAHI_SELLER_NAME") {
            debug!(seller = %name, "Overriding seller name from environment");
            self.seller.name = name;
        }

        if let Some(gstin) = lookup("BAHI_SELLER_GSTIN") {
            self.seller.gstin = Some(gstin);
        }

        if let Some(address) = lookup("BAHI_SELLER_ADDRESS") {
            self.seller.address = Some(address);
        }

        if let Some(rows) = lookup("BAHI_ROW_CAPACITY") {
            match rows.parse::<usize>() {
                Ok(n) => self.layout.row_capacity = n,
                Err(_) => warn!(value = %rows, "Ignoring non-numeric BAHI_ROW_CAPACITY"),
            }
        }

        if let Some(width) = lookup("BAHI_PAGE_WIDTH") {
            match width.parse::<usize>() {
                Ok(n) => self.layout.page_width = n,
                Err(_) => warn!(value = %width, "Ignoring non-numeric BAHI_PAGE_WIDTH"),
            }
        }

        if let Some(height) = lookup("BAHI_PAGE_HEIGHT") {
            match height.parse::<usize>() {
                Ok(n) => self.layout.page_height = n,
                Err(_) => warn!(value = %height, "Ignoring non-numeric BAHI_PAGE_HEIGHT"),
            }
        }

        if let Some(symbol) = lookup("BAHI_CURRENCY_SYMBOL") {
            self.money.symbol = symbol;
        }

        if let Some(grouping) = lookup("BAHI_SLAB_GROUPING") {
            match grouping.to_lowercase().as_str() {
                "hsn_and_rate" => self.slab_grouping = SlabGrouping::HsnAndRate,
                "rate_only" => self.slab_grouping = SlabGrouping::RateOnly,
                _ => warn!(value = %grouping, "Unknown slab grouping in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "bahi", "bahi")
            .map(|dirs| dirs.config_dir().join("bahi.toml"))
    }
}
