//! End-to-end estimates through the public API
//!
//! These tests run the full pipeline (catalog lookup → capacity units →
//! per-region costs → multi-region fold → totals) against the embedded price
//! list and against small hand-built catalogs.

use domain_pricing::capacity::provisioned_capacity_units;
use domain_pricing::*;

const OHIO: &str = "US East (Ohio)";
const OREGON: &str = "US West (Oregon)";
const IRELAND: &str = "Europe (Ireland)";

fn ohio_workload() -> RegionWorkload {
    RegionWorkload {
        average_read_requests_per_second: 100,
        average_write_requests_per_second: 50,
        average_row_size_bytes: 1024,
        storage_gb: 10.0,
        point_in_time_recovery_enabled: false,
        ttl_deletes_per_second: 0.0,
    }
}

fn calculator() -> PricingCalculator<&'static StaticPriceCatalog> {
    PricingCalculator::new(StaticPriceCatalog::embedded().unwrap())
}

#[test]
fn test_single_region_capacity_units() {
    let w = ohio_workload();
    assert_eq!(
        provisioned_capacity_units(
            w.average_write_requests_per_second,
            w.average_row_size_bytes,
            CapacityUnit::Write
        ),
        Some(63)
    );
    assert_eq!(
        provisioned_capacity_units(
            w.average_read_requests_per_second,
            w.average_row_size_bytes,
            CapacityUnit::Read
        ),
        Some(125)
    );
}

#[test]
fn test_single_region_provisioned_costs() {
    let summary = calculator()
        .estimate(&EstimateInput::new(OHIO, ohio_workload()))
        .unwrap();

    // 63 WCU * 24h * $0.00075 * 30.41667 = 34.49 -> 35
    // 125 RCU * 24h * $0.00015 * 30.41667 = 13.69 -> 14
    assert_eq!(summary.provisioned.strong_writes, 35.0);
    assert_eq!(summary.provisioned.strong_reads, 14.0);
    assert_eq!(summary.provisioned.eventual_reads, 7.0);
    assert_eq!(summary.provisioned.eventual_writes, 35.0);
    assert_eq!(summary.provisioned.storage, 2.5);
    assert_eq!(summary.provisioned.ttl_deletes, 0.0);
    assert_eq!(summary.region_count, 1);
    assert!(summary.unpriced_regions.is_empty());

    assert_eq!(
        summary.total(CapacityMode::Provisioned, Consistency::Strong),
        14.0 + 35.0 + 2.5
    );
    assert_eq!(
        summary.total(CapacityMode::Provisioned, Consistency::Eventual),
        7.0 + 35.0 + 2.5
    );
}

#[test]
fn test_two_replicas_multiply_writes_by_region_count() {
    let input = EstimateInput::new(OHIO, ohio_workload())
        .with_replica(OREGON, 20)
        .unwrap()
        .with_replica(IRELAND, 20)
        .unwrap();
    let calc = calculator();
    let summary = calc.estimate(&input).unwrap();

    let single = calc
        .estimate(&EstimateInput::new(OHIO, ohio_workload()))
        .unwrap();
    let primary_write_cost = single.provisioned.strong_writes;

    assert_eq!(summary.region_count, 3);
    assert_eq!(summary.provisioned.strong_writes, primary_write_cost * 1.25 * 3.0);
    assert_eq!(summary.provisioned.eventual_writes, primary_write_cost * 1.25 * 3.0);
    assert_eq!(
        summary.on_demand.strong_writes,
        single.on_demand.strong_writes * 1.25 * 3.0
    );

    // Reads are each region's own read cost, summed, with no multiplier.
    let replica_reads = |region: &str| {
        let workload = RegionWorkload::replica_of(&ohio_workload(), 20);
        let sheet = calc.price_sheet(region).unwrap();
        region_cost_breakdown(region, &workload, &sheet, true)
            .unwrap()
            .provisioned
            .strong_reads
    };
    let expected_reads =
        single.provisioned.strong_reads + replica_reads(OREGON) + replica_reads(IRELAND);
    assert_eq!(summary.provisioned.strong_reads, expected_reads);

    // Each replica stores its own copy of the table.
    let expected_storage = 10.0
        * (calc.price_sheet(OHIO).unwrap().storage_price_per_gb_month
            + calc.price_sheet(OREGON).unwrap().storage_price_per_gb_month
            + calc.price_sheet(IRELAND).unwrap().storage_price_per_gb_month);
    assert!((summary.provisioned.storage - expected_storage).abs() < 1e-9);
}

#[test]
fn test_replicas_contribute_no_writes() {
    let input = EstimateInput::new(OHIO, ohio_workload())
        .with_replica(OREGON, 20)
        .unwrap();
    let summary = calculator().estimate(&input).unwrap();

    let oregon = summary
        .regions
        .iter()
        .find(|r| r.region == OREGON)
        .unwrap();
    assert_eq!(oregon.provisioned.strong_writes, 0.0);
    assert_eq!(oregon.on_demand.strong_writes, 0.0);
    assert!(oregon.provisioned.strong_reads > 0.0);
}

#[test]
fn test_consistency_rules_hold_for_many_workloads() {
    let calc = calculator();
    for reads in [0u64, 1, 37, 1000, 25_000] {
        for writes in [0u64, 3, 250] {
            for row_size in [0u64, 100, 1024, 5000, 40_000] {
                let workload = RegionWorkload {
                    average_read_requests_per_second: reads,
                    average_write_requests_per_second: writes,
                    average_row_size_bytes: row_size,
                    storage_gb: 42.0,
                    point_in_time_recovery_enabled: true,
                    ttl_deletes_per_second: 10.0,
                };
                let input = EstimateInput::new(OHIO, workload)
                    .with_replica(IRELAND, reads / 2)
                    .unwrap();
                let summary = calc.estimate(&input).unwrap();

                for mode in [CapacityMode::Provisioned, CapacityMode::OnDemand] {
                    let p = summary.pricing(mode);
                    assert_eq!(p.eventual_reads, p.strong_reads / 2.0);
                    assert_eq!(p.eventual_writes, p.strong_writes);
                }
            }
        }
    }
}

#[test]
fn test_total_excludes_backup_without_pitr() {
    let mut workload = ohio_workload();
    workload.storage_gb = 500.0;
    workload.ttl_deletes_per_second = 20_000.0;

    let input = EstimateInput::new(OHIO, workload)
        .with_replica(OREGON, 10)
        .unwrap();
    let summary = calculator().estimate(&input).unwrap();
    assert!(summary.provisioned.backup > 0.0);

    for cell in summary.cells() {
        let p = summary.pricing(cell.mode);
        let expected =
            p.reads(cell.consistency) + p.writes(cell.consistency) + p.storage + p.ttl_deletes;
        assert_eq!(cell.total, expected);
    }
}

#[test]
fn test_total_includes_backup_with_pitr() {
    let mut workload = ohio_workload();
    workload.point_in_time_recovery_enabled = true;

    let summary = calculator().estimate(&EstimateInput::new(OHIO, workload)).unwrap();
    assert_eq!(summary.provisioned.backup, 10.0 * 0.2);
    assert_eq!(
        summary.total(CapacityMode::OnDemand, Consistency::Eventual),
        summary.on_demand.eventual_reads
            + summary.on_demand.eventual_writes
            + summary.on_demand.storage
            + summary.on_demand.backup
            + summary.on_demand.ttl_deletes
    );
}

#[test]
fn test_estimate_is_idempotent() {
    let input = EstimateInput::new(OHIO, ohio_workload())
        .with_replica(IRELAND, 75)
        .unwrap();
    let calc = calculator();
    let first = calc.estimate(&input).unwrap();
    let second = calc.estimate(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_unknown_replica_is_silently_skipped() {
    let sheet = StaticPriceCatalog::embedded()
        .unwrap()
        .price_sheet(OHIO)
        .unwrap();
    let catalog = StaticPriceCatalog::from_sheets([(OHIO, sheet)]).unwrap();
    let input = EstimateInput::new(OHIO, ohio_workload())
        .with_replica("Moon Base (Tranquility)", 20)
        .unwrap();

    let summary = PricingCalculator::new(catalog).estimate(&input).unwrap();

    assert_eq!(summary.unpriced_regions, vec!["Moon Base (Tranquility)".to_string()]);
    assert_eq!(summary.regions.len(), 1);
    assert_eq!(summary.provisioned.strong_writes, 35.0 * 1.25 * 2.0);
}

#[test]
fn test_request_file_round_trip_into_estimate() {
    let json = r#"{
        "primary_region": "US East (Ohio)",
        "primary": {
            "average_read_requests_per_second": 100,
            "average_write_requests_per_second": 50,
            "average_row_size_bytes": 1024,
            "storage_gb": 10,
            "point_in_time_recovery_enabled": false,
            "ttl_deletes_per_second": 0
        },
        "replicas": []
    }"#;
    let request: EstimateRequest = serde_json::from_str(json).unwrap();
    let input = EstimateInput::try_from(request).unwrap();

    let summary = calculator().estimate(&input).unwrap();
    assert_eq!(summary.provisioned.strong_writes, 35.0);
}

#[test]
fn test_request_with_too_many_replicas_is_rejected() {
    let replicas: Vec<ReplicaRequest> = [OREGON, IRELAND, "A", "B", "C", "D"]
        .iter()
        .map(|r| ReplicaRequest {
            region: r.to_string(),
            average_read_requests_per_second: 1,
        })
        .collect();
    let request = EstimateRequest {
        primary_region: OHIO.to_string(),
        primary: ohio_workload(),
        replicas,
    };
    let err = EstimateInput::try_from(request).unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

#[test]
fn test_out_of_range_request_rate_is_rejected() {
    let mut workload = ohio_workload();
    workload.average_read_requests_per_second = MAX_REQUESTS_PER_SECOND + 1;

    let err = calculator()
        .estimate(&EstimateInput::new(OHIO, workload))
        .unwrap_err();
    assert!(matches!(err, PricingError::Validation(_)));
}
