//! Price catalog
//!
//! Resolves a region name (e.g. "US East (Ohio)") to its [`RegionPriceSheet`].
//! The catalog document follows the shape of the published Keyspaces price
//! list: one object per region, keyed by product SKU name, each with a `price`
//! given as a JSON number or a decimal string.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{PricingError, PricingResult};
use crate::models::RegionPriceSheet;

const READ_UNITS_SKU: &str = "MCS-ReadUnits";
const WRITE_UNITS_SKU: &str = "MCS-WriteUnits";
const PROVISIONED_READ_UNITS_SKU: &str = "Provisioned Read Units";
const PROVISIONED_WRITE_UNITS_SKU: &str = "Provisioned Write Units";
const STORAGE_SKU: &str = "AmazonMCS - Indexed DataStore per GB-Mo";
const PITR_BACKUP_SKU: &str = "Point-In-Time-Restore PITR Backup Storage per GB-Mo";
const TTL_SKU: &str = "Time to Live";

const EMBEDDED_CATALOG_JSON: &str = include_str!("../data/keyspaces_pricing.json");

/// Catalog compiled into the binary, parsed on first use
static EMBEDDED_CATALOG: Lazy<Result<StaticPriceCatalog, String>> =
    Lazy::new(|| StaticPriceCatalog::from_json(EMBEDDED_CATALOG_JSON).map_err(|e| e.to_string()));

/// Read-only lookup from region name to unit prices.
///
/// Lookups are by exact key. A region without pricing yields `None`; callers
/// decide whether that is an error.
#[cfg_attr(test, mockall::automock)]
pub trait PriceCatalog: Send + Sync {
    /// Price sheet for `region`, if the catalog has one
    fn price_sheet(&self, region: &str) -> Option<RegionPriceSheet>;

    /// All regions with pricing, sorted by name
    fn regions(&self) -> Vec<String>;
}

impl<T: PriceCatalog + ?Sized> PriceCatalog for &T {
    fn price_sheet(&self, region: &str) -> Option<RegionPriceSheet> {
        (**self).price_sheet(region)
    }

    fn regions(&self) -> Vec<String> {
        (**self).regions()
    }
}

impl<T: PriceCatalog + ?Sized> PriceCatalog for Arc<T> {
    fn price_sheet(&self, region: &str) -> Option<RegionPriceSheet> {
        (**self).price_sheet(region)
    }

    fn regions(&self) -> Vec<String> {
        (**self).regions()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    regions: BTreeMap<String, BTreeMap<String, PriceItem>>,
}

#[derive(Debug, Deserialize)]
struct PriceItem {
    price: PriceValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    fn as_f64(&self) -> Result<f64, String> {
        match self {
            PriceValue::Number(value) => Ok(*value),
            PriceValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("'{text}' is not a number: {e}")),
        }
    }
}

/// In-memory price catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticPriceCatalog {
    sheets: BTreeMap<String, RegionPriceSheet>,
}

impl StaticPriceCatalog {
    /// The catalog bundled with the crate.
    pub fn embedded() -> PricingResult<&'static StaticPriceCatalog> {
        EMBEDDED_CATALOG
            .as_ref()
            .map_err(|e| PricingError::Catalog(e.clone()))
    }

    /// Build a catalog from already-resolved price sheets.
    pub fn from_sheets<I, S>(sheets: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = (S, RegionPriceSheet)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (region, sheet) in sheets {
            let region = region.into();
            sheet
                .check()
                .map_err(|e| PricingError::Catalog(format!("{region}: {e}")))?;
            catalog.sheets.insert(region, sheet);
        }
        Ok(catalog)
    }

    /// Parse a price list document.
    ///
    /// Regions missing one of the required SKUs are skipped with a warning so a
    /// partial price list still serves the regions it does cover. Unparseable,
    /// negative, or non-finite prices reject the whole document.
    pub fn from_json(json: &str) -> PricingResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut sheets = BTreeMap::new();

        for (region, items) in document.regions {
            match sheet_from_items(&items) {
                Ok(Some(sheet)) => {
                    sheet
                        .check()
                        .map_err(|e| PricingError::Catalog(format!("{region}: {e}")))?;
                    sheets.insert(region, sheet);
                }
                Ok(None) => {
                    warn!(region = %region, "Price list entry is incomplete, region skipped");
                }
                Err(e) => return Err(PricingError::Catalog(format!("{region}: {e}"))),
            }
        }

        debug!(regions = sheets.len(), "Loaded price catalog");
        Ok(Self { sheets })
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl PriceCatalog for StaticPriceCatalog {
    fn price_sheet(&self, region: &str) -> Option<RegionPriceSheet> {
        self.sheets.get(region).copied()
    }

    fn regions(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}

fn sheet_from_items(
    items: &BTreeMap<String, PriceItem>,
) -> Result<Option<RegionPriceSheet>, String> {
    let price = |sku: &str| -> Result<Option<f64>, String> {
        items
            .get(sku)
            .map(|item| item.price.as_f64().map_err(|e| format!("{sku}: {e}")))
            .transpose()
    };

    let (
        Some(read_unit_price),
        Some(write_unit_price),
        Some(provisioned_read_unit_hour_price),
        Some(provisioned_write_unit_hour_price),
        Some(storage_price_per_gb_month),
        Some(backup_price_per_gb_month),
        Some(ttl_delete_price),
    ) = (
        price(READ_UNITS_SKU)?,
        price(WRITE_UNITS_SKU)?,
        price(PROVISIONED_READ_UNITS_SKU)?,
        price(PROVISIONED_WRITE_UNITS_SKU)?,
        price(STORAGE_SKU)?,
        price(PITR_BACKUP_SKU)?,
        price(TTL_SKU)?,
    )
    else {
        return Ok(None);
    };

    Ok(Some(RegionPriceSheet {
        read_unit_price,
        write_unit_price,
        provisioned_read_unit_hour_price,
        provisioned_write_unit_hour_price,
        storage_price_per_gb_month,
        backup_price_per_gb_month,
        ttl_delete_price,
    }))
}
