//! Estimate arguments
//!
//! A workload comes either from a JSON file (`--input`) or from individual
//! flags. Both paths go through [`EstimateRequest`] so they get the same
//! replica checks and field validation.

use clap::Args;
use domain_pricing::{EstimateInput, EstimateRequest, RegionWorkload, ReplicaRequest};
use eyre::{Result, WrapErr};
use std::path::PathBuf;

use crate::report::OutputFormat;

#[derive(Debug, Clone, Args)]
pub struct EstimateArgs {
    /// Workload JSON file. Takes precedence over the workload flags.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Primary region, e.g. "US East (Ohio)". Defaults to PRICING_DEFAULT_REGION.
    #[arg(short = 'R', long)]
    pub region: Option<String>,

    /// Average read requests per second
    #[arg(long, default_value_t = 0)]
    pub reads: u64,

    /// Average write requests per second
    #[arg(long, default_value_t = 0)]
    pub writes: u64,

    /// Average row size in bytes
    #[arg(long, default_value_t = 0)]
    pub row_size: u64,

    /// Table storage in GB
    #[arg(long, default_value_t = 0.0)]
    pub storage_gb: f64,

    /// Enable point-in-time recovery
    #[arg(long)]
    pub pitr: bool,

    /// TTL deletes per day
    #[arg(long, default_value_t = 0.0)]
    pub ttl_deletes: f64,

    /// Replica region and its read rate, as "Region=reads". Repeatable.
    #[arg(long = "replica", value_parser = parse_replica)]
    pub replicas: Vec<ReplicaRequest>,

    /// Output format. Defaults to PRICING_OUTPUT_FORMAT.
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Include strong-consistency columns
    #[arg(long)]
    pub show_strong: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parse `"Europe (Ireland)=20"`. Splits on the last `=` so region names are
/// taken verbatim.
pub fn parse_replica(value: &str) -> Result<ReplicaRequest, String> {
    let (region, reads) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected REGION=READS, got '{value}'"))?;
    let region = region.trim();
    if region.is_empty() {
        return Err(format!("missing region in '{value}'"));
    }
    let reads = reads
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid read rate in '{value}': {e}"))?;

    Ok(ReplicaRequest {
        region: region.to_string(),
        average_read_requests_per_second: reads,
    })
}

impl EstimateArgs {
    fn flag_workload(&self) -> RegionWorkload {
        RegionWorkload {
            average_read_requests_per_second: self.reads,
            average_write_requests_per_second: self.writes,
            average_row_size_bytes: self.row_size,
            storage_gb: self.storage_gb,
            point_in_time_recovery_enabled: self.pitr,
            ttl_deletes_per_second: self.ttl_deletes,
        }
    }

    /// Build the estimate input. `--region` overrides the region in a file.
    pub fn to_request(&self, default_region: &str) -> Result<EstimateRequest> {
        let mut request = match &self.input {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read workload {}", path.display()))?;
                serde_json::from_str::<EstimateRequest>(&json)
                    .wrap_err_with(|| format!("Invalid workload file {}", path.display()))?
            }
            None => EstimateRequest {
                primary_region: default_region.to_string(),
                primary: self.flag_workload(),
                replicas: self.replicas.clone(),
            },
        };

        if let Some(region) = &self.region {
            request.primary_region = region.clone();
        }
        Ok(request)
    }

    pub fn to_input(&self, default_region: &str) -> Result<EstimateInput> {
        let request = self.to_request(default_region)?;
        EstimateInput::try_from(request).wrap_err("Invalid workload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: EstimateArgs,
    }

    fn parse(args: &[&str]) -> EstimateArgs {
        TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_parse_replica() {
        let replica = parse_replica("Europe (Ireland)=20").unwrap();
        assert_eq!(replica.region, "Europe (Ireland)");
        assert_eq!(replica.average_read_requests_per_second, 20);

        assert!(parse_replica("Europe (Ireland)").is_err());
        assert!(parse_replica("=20").is_err());
        assert!(parse_replica("US West (Oregon)=many").is_err());
    }

    #[test]
    fn test_flags_build_input() {
        let args = parse(&[
            "--reads",
            "100",
            "--writes",
            "50",
            "--row-size",
            "1024",
            "--storage-gb",
            "10",
            "--pitr",
            "--replica",
            "US West (Oregon)=20",
            "--replica",
            "Europe (Ireland)=30",
        ]);
        let input = args.to_input("US East (Ohio)").unwrap();

        assert_eq!(input.primary().region, "US East (Ohio)");
        let primary = input.primary().workload;
        assert_eq!(primary.average_write_requests_per_second, 50);
        assert!(primary.point_in_time_recovery_enabled);
        assert_eq!(input.replicas().len(), 2);
        assert_eq!(input.replicas()[1].workload.average_read_requests_per_second, 30);
        assert_eq!(input.replicas()[1].workload.average_write_requests_per_second, 0);
        assert_eq!(input.replicas()[1].workload.storage_gb, 10.0);
    }

    #[test]
    fn test_region_flag_overrides_default() {
        let args = parse(&["-R", "Europe (Ireland)", "--reads", "5"]);
        let input = args.to_input("US East (Ohio)").unwrap();
        assert_eq!(input.primary().region, "Europe (Ireland)");
    }

    #[test]
    fn test_duplicate_replica_is_rejected() {
        let args = parse(&["--replica", "US West (Oregon)=1", "--replica", "US West (Oregon)=2"]);
        assert!(args.to_input("US East (Ohio)").is_err());
    }

    #[test]
    fn test_negative_storage_is_rejected() {
        let args = parse(&["--storage-gb=-1"]);
        assert!(args.to_input("US East (Ohio)").is_err());
    }

    #[test]
    fn test_request_rate_above_cap_is_rejected() {
        let args = parse(&["--writes", "18446744073709551615"]);
        let err = args.to_input("US East (Ohio)").unwrap_err();
        assert!(err.to_string().contains("Invalid workload"));
    }

    #[test]
    fn test_input_file_takes_precedence() {
        let path = std::env::temp_dir().join(format!(
            "pricing-calculator-input-{}.json",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "primary_region": "US West (Oregon)",
                "primary": {{ "averageWriteRequests": 7, "average_row_size_bytes": 512 }},
                "replicas": [{{
                    "region": "Europe (Ireland)",
                    "average_read_requests_per_second": 3
                }}]
            }}"#
        )
        .unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = parse(&["--input", &path_arg, "--writes", "999"]);
        let input = args.to_input("US East (Ohio)").unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(input.primary().region, "US West (Oregon)");
        assert_eq!(input.primary().workload.average_write_requests_per_second, 7);
        assert_eq!(input.replicas()[0].region, "Europe (Ireland)");
    }

    #[test]
    fn test_missing_input_file() {
        let args = parse(&["--input", "/nonexistent/workload.json"]);
        let err = args.to_input("US East (Ohio)").unwrap_err();
        assert!(err.to_string().contains("Failed to read workload"));
    }
}
