//! Capacity unit arithmetic
//!
//! Converts request rates and row sizes into billable capacity units. All
//! functions are pure; none of them touch prices except
//! [`strong_consistency_priced_units`].

/// Bytes covered by one read capacity unit, in KB
pub const READ_UNIT_SIZE_KB: u64 = 4;

/// Bytes covered by one write capacity unit, in KB
pub const WRITE_UNIT_SIZE_KB: u64 = 1;

/// Recommended provisioned utilization target (80%), kept as a percentage so
/// the headroom division stays in integer arithmetic.
pub const PROVISIONED_UTILIZATION_TARGET_PERCENT: u64 = 80;

/// Average days per month (365 / 12)
pub const DAYS_PER_MONTH: f64 = 30.41667;

/// Provisioned capacity is billed for every hour of the day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Seconds in an average month
pub const SECONDS_PER_MONTH: f64 = 3600.0 * 24.0 * DAYS_PER_MONTH;

/// Kind of capacity unit a request consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityUnit {
    /// Covers up to [`READ_UNIT_SIZE_KB`] of row per request
    Read,
    /// Covers up to [`WRITE_UNIT_SIZE_KB`] of row per request
    Write,
}

impl CapacityUnit {
    pub const fn size_kb(self) -> u64 {
        match self {
            CapacityUnit::Read => READ_UNIT_SIZE_KB,
            CapacityUnit::Write => WRITE_UNIT_SIZE_KB,
        }
    }

    pub const fn size_bytes(self) -> u64 {
        self.size_kb() * 1024
    }
}

/// Capacity units a single request consumes for a row of `row_size_bytes`.
///
/// Rounds up to whole units and never drops below one unit.
pub fn units_per_request(row_size_bytes: u64, unit: CapacityUnit) -> u64 {
    row_size_bytes.div_ceil(unit.size_bytes()).max(1)
}

/// Provisioned capacity units needed to serve `requests_per_second` with headroom.
///
/// `ceil(requests * units_per_request / 0.80)`, or `None` if the product does
/// not fit in a `u64`.
pub fn provisioned_capacity_units(
    requests_per_second: u64,
    row_size_bytes: u64,
    unit: CapacityUnit,
) -> Option<u64> {
    let consumed = on_demand_capacity_units(requests_per_second, row_size_bytes, unit)?;
    Some(
        consumed
            .checked_mul(100)?
            .div_ceil(PROVISIONED_UTILIZATION_TARGET_PERCENT),
    )
}

/// On-demand capacity units consumed per second. No headroom, no monthly scaling.
pub fn on_demand_capacity_units(
    requests_per_second: u64,
    row_size_bytes: u64,
    unit: CapacityUnit,
) -> Option<u64> {
    requests_per_second.checked_mul(units_per_request(row_size_bytes, unit))
}

/// On-demand capacity units consumed over an average month.
pub fn on_demand_monthly_units(
    requests_per_second: u64,
    row_size_bytes: u64,
    unit: CapacityUnit,
) -> Option<f64> {
    on_demand_capacity_units(requests_per_second, row_size_bytes, unit)
        .map(|units| units as f64 * SECONDS_PER_MONTH)
}

/// Monthly cost of holding `avg_capacity_units` provisioned for `hours_per_day`
/// every day, rounded up to whole dollars.
pub fn strong_consistency_priced_units(
    avg_capacity_units: u64,
    hours_per_day: f64,
    unit_price: f64,
) -> f64 {
    (avg_capacity_units as f64 * hours_per_day * unit_price * DAYS_PER_MONTH).ceil()
}

/// TTL delete units billed per month.
///
/// `ttl_deletes_per_day` is scaled by 365 / 12 and each delete costs one unit
/// per started KB of row. Rows under 1 KB still cost a unit; an empty row costs none.
pub fn ttl_delete_monthly_units(ttl_deletes_per_day: f64, row_size_bytes: u64) -> f64 {
    ttl_deletes_per_day * row_size_bytes.div_ceil(1024) as f64 * 365.0 / 12.0
}
