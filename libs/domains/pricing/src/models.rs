use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

use crate::error::{PricingError, PricingResult};

/// Maximum number of regions a table can be replicated to besides its primary.
pub const MAX_REPLICA_REGIONS: usize = 5;

/// Region used when the caller does not pick one.
pub const DEFAULT_REGION: &str = "US East (Ohio)";

/// Highest read or write rate accepted for a single region
pub const MAX_REQUESTS_PER_SECOND: u64 = 1_000_000_000;

/// Largest row a table can hold (1 MB)
pub const MAX_ROW_SIZE_BYTES: u64 = 1024 * 1024;

/// Capacity (billing) mode of a table
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityMode {
    /// Pre-allocated throughput billed per unit-hour
    Provisioned,
    /// Throughput billed per request
    OnDemand,
}

/// Read consistency model
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Consistency {
    Strong,
    Eventual,
}

/// Unit prices for a single region, in USD.
///
/// Built by the price catalog; every price is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPriceSheet {
    /// On-demand price per read request unit
    pub read_unit_price: f64,
    /// On-demand price per write request unit
    pub write_unit_price: f64,
    /// Provisioned price per read capacity unit-hour
    pub provisioned_read_unit_hour_price: f64,
    /// Provisioned price per write capacity unit-hour
    pub provisioned_write_unit_hour_price: f64,
    pub storage_price_per_gb_month: f64,
    /// Point-in-time recovery backup storage
    pub backup_price_per_gb_month: f64,
    /// Price per TTL delete unit
    pub ttl_delete_price: f64,
}

impl RegionPriceSheet {
    /// All prices paired with a human-readable name, in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("read_unit_price", self.read_unit_price),
            ("write_unit_price", self.write_unit_price),
            (
                "provisioned_read_unit_hour_price",
                self.provisioned_read_unit_hour_price,
            ),
            (
                "provisioned_write_unit_hour_price",
                self.provisioned_write_unit_hour_price,
            ),
            ("storage_price_per_gb_month", self.storage_price_per_gb_month),
            ("backup_price_per_gb_month", self.backup_price_per_gb_month),
            ("ttl_delete_price", self.ttl_delete_price),
        ]
    }

    /// Check the non-negative, finite price invariant.
    pub fn check(&self) -> PricingResult<()> {
        for (name, price) in self.entries() {
            if !price.is_finite() || price < 0.0 {
                return Err(PricingError::Catalog(format!(
                    "{name} must be a non-negative number, got {price}"
                )));
            }
        }
        Ok(())
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

/// Expected workload of one region.
///
/// `ttl_deletes_per_second` keeps the name users see on the input form, but
/// the cost engine treats it as a *daily* count (it is scaled by 365 / 12 to a
/// monthly volume).
///
/// Request rates and row size are capped so capacity units always fit in a
/// `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegionWorkload {
    #[serde(alias = "averageReadRequests")]
    #[validate(range(max = MAX_REQUESTS_PER_SECOND))]
    pub average_read_requests_per_second: u64,
    #[serde(alias = "averageWriteRequests")]
    #[validate(range(max = MAX_REQUESTS_PER_SECOND))]
    pub average_write_requests_per_second: u64,
    #[serde(alias = "averageRowSizeInBytes")]
    #[validate(range(max = MAX_ROW_SIZE_BYTES))]
    pub average_row_size_bytes: u64,
    #[serde(alias = "storageInGb")]
    #[validate(range(min = 0.0), custom(function = "validate_finite"))]
    pub storage_gb: f64,
    #[serde(alias = "pointInTimeRecovery")]
    pub point_in_time_recovery_enabled: bool,
    #[serde(alias = "ttlDeletesPerSecond")]
    #[validate(range(min = 0.0), custom(function = "validate_finite"))]
    pub ttl_deletes_per_second: f64,
}

impl RegionWorkload {
    /// Derive the workload of a replica region from the primary's.
    ///
    /// Replicas only serve reads: the write rate is zero and every other field
    /// mirrors the primary. Only the read rate is independent.
    pub fn replica_of(primary: &RegionWorkload, average_read_requests_per_second: u64) -> Self {
        Self {
            average_read_requests_per_second,
            average_write_requests_per_second: 0,
            ..*primary
        }
    }
}

/// A region and the workload it carries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionInput {
    pub region: String,
    pub workload: RegionWorkload,
}

/// Snapshot of everything an estimate depends on.
///
/// Holds exactly one primary region and up to [`MAX_REPLICA_REGIONS`]
/// replicas. Replica workloads are always derived from the primary through
/// [`RegionWorkload::replica_of`], so the mirroring invariant cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateInput {
    primary: RegionInput,
    replicas: Vec<RegionInput>,
}

impl EstimateInput {
    pub fn new(region: impl Into<String>, workload: RegionWorkload) -> Self {
        Self {
            primary: RegionInput {
                region: region.into(),
                workload,
            },
            replicas: Vec::new(),
        }
    }

    /// Builder form of [`EstimateInput::add_replica`].
    pub fn with_replica(
        mut self,
        region: impl Into<String>,
        average_read_requests_per_second: u64,
    ) -> PricingResult<Self> {
        self.add_replica(region, average_read_requests_per_second)?;
        Ok(self)
    }

    /// Replicate to another region serving `average_read_requests_per_second` reads.
    pub fn add_replica(
        &mut self,
        region: impl Into<String>,
        average_read_requests_per_second: u64,
    ) -> PricingResult<()> {
        let region = region.into();

        if region == self.primary.region {
            return Err(PricingError::InvalidInput(format!(
                "replica region '{region}' is already the primary region"
            )));
        }
        if self.replicas.iter().any(|r| r.region == region) {
            return Err(PricingError::InvalidInput(format!(
                "region '{region}' is already a replica"
            )));
        }
        if self.replicas.len() >= MAX_REPLICA_REGIONS {
            return Err(PricingError::InvalidInput(format!(
                "at most {MAX_REPLICA_REGIONS} replica regions are supported"
            )));
        }

        let workload =
            RegionWorkload::replica_of(&self.primary.workload, average_read_requests_per_second);
        self.replicas.push(RegionInput { region, workload });
        Ok(())
    }

    /// Stop replicating to `region`. Returns whether it was a replica.
    pub fn remove_replica(&mut self, region: &str) -> bool {
        let before = self.replicas.len();
        self.replicas.retain(|r| r.region != region);
        self.replicas.len() != before
    }

    /// Change the read rate of an existing replica.
    pub fn set_replica_reads(
        &mut self,
        region: &str,
        average_read_requests_per_second: u64,
    ) -> PricingResult<()> {
        let primary = self.primary.workload;
        let replica = self
            .replicas
            .iter_mut()
            .find(|r| r.region == region)
            .ok_or_else(|| PricingError::InvalidInput(format!("'{region}' is not a replica")))?;
        replica.workload = RegionWorkload::replica_of(&primary, average_read_requests_per_second);
        Ok(())
    }

    /// Replace the primary workload and re-derive every replica from it.
    pub fn set_primary_workload(&mut self, workload: RegionWorkload) {
        self.primary.workload = workload;
        for replica in &mut self.replicas {
            replica.workload = RegionWorkload::replica_of(
                &workload,
                replica.workload.average_read_requests_per_second,
            );
        }
    }

    pub fn primary(&self) -> &RegionInput {
        &self.primary
    }

    pub fn replicas(&self) -> &[RegionInput] {
        &self.replicas
    }

    /// Primary first, then replicas in insertion order
    pub fn regions(&self) -> impl Iterator<Item = &RegionInput> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }

    pub fn region_count(&self) -> usize {
        1 + self.replicas.len()
    }

    pub fn is_multi_region(&self) -> bool {
        !self.replicas.is_empty()
    }

    /// Run field validation on every region's workload.
    pub fn validate(&self) -> PricingResult<()> {
        for input in self.regions() {
            input.workload.validate()?;
        }
        Ok(())
    }
}

/// Replica entry of an [`EstimateRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaRequest {
    pub region: String,
    #[serde(default, alias = "averageReadRequests")]
    pub average_read_requests_per_second: u64,
}

/// Serialized form of an estimate, as read from workload files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default = "default_region")]
    pub primary_region: String,
    #[serde(default)]
    pub primary: RegionWorkload,
    #[serde(default)]
    pub replicas: Vec<ReplicaRequest>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl TryFrom<EstimateRequest> for EstimateInput {
    type Error = PricingError;

    fn try_from(request: EstimateRequest) -> PricingResult<Self> {
        let mut input = EstimateInput::new(request.primary_region, request.primary);
        for replica in request.replicas {
            input.add_replica(replica.region, replica.average_read_requests_per_second)?;
        }
        input.validate()?;
        Ok(input)
    }
}
