//! Pricing Domain
//!
//! Monthly cost estimation for Amazon Keyspaces tables, across provisioned and
//! on-demand capacity and strong and eventual read consistency, for a primary
//! region replicated to up to five more.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ Calculator  │  ← Multi-region fold, replication multipliers, totals
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Cost     │  ← Per-region costs under both capacity modes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │  Capacity   │     │   Catalog   │  ← Region → unit prices
//! └──────┬──────┘     └──────┬──────┘
//!        │                   │
//! ┌──────▼───────────────────▼──────┐
//! │             Models              │  ← Workloads, price sheets, enums
//! └─────────────────────────────────┘
//! ```
//!
//! Everything below the catalog boundary is pure and synchronous: the same
//! [`EstimateInput`] and catalog always produce the same [`PricingSummary`].

pub mod calculator;
pub mod capacity;
pub mod catalog;
pub mod cost;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use calculator::{AggregatedPricing, PricingCalculator, PricingSummary, TotalCell};
pub use capacity::CapacityUnit;
pub use catalog::{PriceCatalog, StaticPriceCatalog};
pub use cost::{
    region_cost_breakdown, CostMetrics, RegionCostBreakdown, MULTI_REGION_WRITE_SURCHARGE,
};
pub use error::{PricingError, PricingResult};
pub use models::{
    CapacityMode, Consistency, EstimateInput, EstimateRequest, RegionInput, RegionPriceSheet,
    RegionWorkload, ReplicaRequest, DEFAULT_REGION, MAX_REPLICA_REGIONS, MAX_REQUESTS_PER_SECOND,
    MAX_ROW_SIZE_BYTES,
};
