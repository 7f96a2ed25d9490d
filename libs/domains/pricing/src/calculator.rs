//! Multi-region aggregation and totals
//!
//! [`PricingCalculator::estimate`] prices every region of an
//! [`EstimateInput`], folds the per-region costs into one [`AggregatedPricing`]
//! per capacity mode, and applies the replication write multiplier.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::catalog::PriceCatalog;
use crate::cost::{region_cost_breakdown, CostMetrics, RegionCostBreakdown};
use crate::error::{PricingError, PricingResult};
use crate::models::{CapacityMode, Consistency, EstimateInput, RegionPriceSheet};

/// Cost metrics summed over every region for one capacity mode
pub type AggregatedPricing = CostMetrics;

/// One cell of the comparison table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalCell {
    pub mode: CapacityMode,
    pub consistency: Consistency,
    pub total: f64,
}

/// Result of an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub provisioned: AggregatedPricing,
    pub on_demand: AggregatedPricing,
    /// Backup is counted when the primary region has point-in-time recovery on
    pub include_backup: bool,
    pub region_count: usize,
    /// Per-region costs, before the region-count write multiplier
    pub regions: Vec<RegionCostBreakdown>,
    /// Regions skipped for lack of pricing
    pub unpriced_regions: Vec<String>,
}

impl PricingSummary {
    pub fn pricing(&self, mode: CapacityMode) -> &AggregatedPricing {
        match mode {
            CapacityMode::Provisioned => &self.provisioned,
            CapacityMode::OnDemand => &self.on_demand,
        }
    }

    /// reads + writes + storage + backup (when PITR is on) + TTL deletes
    pub fn total(&self, mode: CapacityMode, consistency: Consistency) -> f64 {
        self.pricing(mode).total(consistency, self.include_backup)
    }

    /// The four totals in table column order: provisioned-strong,
    /// on-demand-strong, provisioned-eventual, on-demand-eventual.
    pub fn cells(&self) -> [TotalCell; 4] {
        let cell = |mode, consistency| TotalCell {
            mode,
            consistency,
            total: self.total(mode, consistency),
        };
        [
            cell(CapacityMode::Provisioned, Consistency::Strong),
            cell(CapacityMode::OnDemand, Consistency::Strong),
            cell(CapacityMode::Provisioned, Consistency::Eventual),
            cell(CapacityMode::OnDemand, Consistency::Eventual),
        ]
    }
}

/// Cost estimator over a price catalog
#[derive(Debug, Clone)]
pub struct PricingCalculator<C: PriceCatalog> {
    catalog: C,
}

impl<C: PriceCatalog> PricingCalculator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Price sheet for a region, or [`PricingError::NotFound`]
    pub fn price_sheet(&self, region: &str) -> PricingResult<RegionPriceSheet> {
        self.catalog
            .price_sheet(region)
            .ok_or_else(|| PricingError::NotFound(region.to_string()))
    }

    /// Estimate monthly costs for `input`.
    ///
    /// The input is validated first; out-of-range workloads are rejected
    /// rather than priced. Regions without pricing contribute nothing and are
    /// listed in [`PricingSummary::unpriced_regions`]. Write metrics of the
    /// aggregate are multiplied by the region count when the table is
    /// replicated, since every replica applies every write.
    #[instrument(
        skip_all,
        fields(primary = %input.primary().region, regions = input.region_count())
    )]
    pub fn estimate(&self, input: &EstimateInput) -> PricingResult<PricingSummary> {
        input.validate()?;

        let multi_region = input.is_multi_region();
        let mut regions = Vec::with_capacity(input.region_count());
        let mut unpriced_regions = Vec::new();

        for region_input in input.regions() {
            match self.catalog.price_sheet(&region_input.region) {
                Some(prices) => regions.push(region_cost_breakdown(
                    &region_input.region,
                    &region_input.workload,
                    &prices,
                    multi_region,
                )?),
                None => {
                    warn!(region = %region_input.region, "No pricing available, region skipped");
                    unpriced_regions.push(region_input.region.clone());
                }
            }
        }

        let writes_multiplier = if multi_region {
            input.region_count() as f64
        } else {
            1.0
        };

        let provisioned: CostMetrics = regions.iter().map(|r| r.provisioned).sum();
        let on_demand: CostMetrics = regions.iter().map(|r| r.on_demand).sum();

        let summary = PricingSummary {
            provisioned: provisioned.scale_writes(writes_multiplier),
            on_demand: on_demand.scale_writes(writes_multiplier),
            include_backup: input.primary().workload.point_in_time_recovery_enabled,
            region_count: input.region_count(),
            regions,
            unpriced_regions,
        };

        info!(
            provisioned_eventual = summary.total(CapacityMode::Provisioned, Consistency::Eventual),
            on_demand_eventual = summary.total(CapacityMode::OnDemand, Consistency::Eventual),
            "Estimate complete"
        );

        Ok(summary)
    }
}
