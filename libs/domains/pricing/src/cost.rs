//! Per-region cost computation

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;
use tracing::debug;

use crate::capacity::{
    on_demand_monthly_units, provisioned_capacity_units, strong_consistency_priced_units,
    ttl_delete_monthly_units, CapacityUnit, HOURS_PER_DAY,
};
use crate::error::{PricingError, PricingResult};
use crate::models::{CapacityMode, Consistency, RegionPriceSheet, RegionWorkload};

/// Write surcharge applied in every region once the table is replicated
pub const MULTI_REGION_WRITE_SURCHARGE: f64 = 1.25;

/// Monthly USD cost of each metric under one capacity mode.
///
/// Storage, backup and TTL deletes do not depend on the consistency model and
/// are stored once.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostMetrics {
    pub strong_reads: f64,
    pub eventual_reads: f64,
    pub strong_writes: f64,
    pub eventual_writes: f64,
    pub storage: f64,
    /// Point-in-time recovery; only counted in totals when PITR is enabled
    pub backup: f64,
    pub ttl_deletes: f64,
}

impl CostMetrics {
    pub fn reads(&self, consistency: Consistency) -> f64 {
        match consistency {
            Consistency::Strong => self.strong_reads,
            Consistency::Eventual => self.eventual_reads,
        }
    }

    pub fn writes(&self, consistency: Consistency) -> f64 {
        match consistency {
            Consistency::Strong => self.strong_writes,
            Consistency::Eventual => self.eventual_writes,
        }
    }

    /// Sum of every metric for one consistency model.
    pub fn total(&self, consistency: Consistency, include_backup: bool) -> f64 {
        let backup = if include_backup { self.backup } else { 0.0 };
        self.reads(consistency)
            + self.writes(consistency)
            + self.storage
            + backup
            + self.ttl_deletes
    }

    /// Multiply both write metrics by `factor`.
    pub fn scale_writes(self, factor: f64) -> Self {
        Self {
            strong_writes: self.strong_writes * factor,
            eventual_writes: self.eventual_writes * factor,
            ..self
        }
    }
}

impl Add for CostMetrics {
    type Output = CostMetrics;

    fn add(self, rhs: CostMetrics) -> CostMetrics {
        CostMetrics {
            strong_reads: self.strong_reads + rhs.strong_reads,
            eventual_reads: self.eventual_reads + rhs.eventual_reads,
            strong_writes: self.strong_writes + rhs.strong_writes,
            eventual_writes: self.eventual_writes + rhs.eventual_writes,
            storage: self.storage + rhs.storage,
            backup: self.backup + rhs.backup,
            ttl_deletes: self.ttl_deletes + rhs.ttl_deletes,
        }
    }
}

impl Sum for CostMetrics {
    fn sum<I: Iterator<Item = CostMetrics>>(iter: I) -> Self {
        iter.fold(CostMetrics::default(), Add::add)
    }
}

impl<'a> Sum<&'a CostMetrics> for CostMetrics {
    fn sum<I: Iterator<Item = &'a CostMetrics>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Costs of a single region under both capacity modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCostBreakdown {
    pub region: String,
    pub provisioned: CostMetrics,
    pub on_demand: CostMetrics,
}

impl RegionCostBreakdown {
    pub fn metrics(&self, mode: CapacityMode) -> &CostMetrics {
        match mode {
            CapacityMode::Provisioned => &self.provisioned,
            CapacityMode::OnDemand => &self.on_demand,
        }
    }
}

/// Price one region's workload.
///
/// `multi_region` selects the write surcharge. The region-count write
/// multiplier is not applied here; that happens once over the aggregate.
///
/// Fails with [`PricingError::InvalidInput`] when the capacity units of the
/// workload overflow.
pub fn region_cost_breakdown(
    region: &str,
    workload: &RegionWorkload,
    prices: &RegionPriceSheet,
    multi_region: bool,
) -> PricingResult<RegionCostBreakdown> {
    let write_surcharge = if multi_region {
        MULTI_REGION_WRITE_SURCHARGE
    } else {
        1.0
    };
    let reads = workload.average_read_requests_per_second;
    let writes = workload.average_write_requests_per_second;
    let row_size = workload.average_row_size_bytes;

    let storage = workload.storage_gb * prices.storage_price_per_gb_month;
    let backup = workload.storage_gb * prices.backup_price_per_gb_month;
    let ttl_deletes = ttl_delete_monthly_units(workload.ttl_deletes_per_second, row_size)
        * prices.ttl_delete_price;

    let too_large = || {
        PricingError::InvalidInput(format!("{region}: request rate is too large to price"))
    };

    let provisioned_reads = strong_consistency_priced_units(
        provisioned_capacity_units(reads, row_size, CapacityUnit::Read).ok_or_else(too_large)?,
        HOURS_PER_DAY,
        prices.provisioned_read_unit_hour_price,
    );
    let provisioned_writes = strong_consistency_priced_units(
        provisioned_capacity_units(writes, row_size, CapacityUnit::Write).ok_or_else(too_large)?,
        HOURS_PER_DAY,
        prices.provisioned_write_unit_hour_price,
    ) * write_surcharge;

    let on_demand_reads = on_demand_monthly_units(reads, row_size, CapacityUnit::Read)
        .ok_or_else(too_large)?
        * prices.read_unit_price;
    let on_demand_writes = on_demand_monthly_units(writes, row_size, CapacityUnit::Write)
        .ok_or_else(too_large)?
        * prices.write_unit_price
        * write_surcharge;

    let breakdown = RegionCostBreakdown {
        region: region.to_string(),
        provisioned: with_consistency(
            provisioned_reads,
            provisioned_writes,
            storage,
            backup,
            ttl_deletes,
        ),
        on_demand: with_consistency(
            on_demand_reads,
            on_demand_writes,
            storage,
            backup,
            ttl_deletes,
        ),
    };

    debug!(
        region,
        provisioned_reads,
        provisioned_writes,
        on_demand_reads,
        on_demand_writes,
        "Priced region"
    );

    Ok(breakdown)
}

// Eventual reads use half the capacity of strong reads; writes cost the same
// under either model.
fn with_consistency(
    strong_reads: f64,
    strong_writes: f64,
    storage: f64,
    backup: f64,
    ttl_deletes: f64,
) -> CostMetrics {
    CostMetrics {
        strong_reads,
        eventual_reads: strong_reads / 2.0,
        strong_writes,
        eventual_writes: strong_writes,
        storage,
        backup,
        ttl_deletes,
    }
}
