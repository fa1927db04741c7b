use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

const BENCH: &str = "list_benchmark";
const CRITERION_DIR: &str = "target/criterion";
const REPORT_PATH: &str = "benchmark_results/report.md";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "strand workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the list benchmarks and write a markdown report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,

        /// Only run benchmarks whose id contains this filter
        #[arg(long)]
        filter: Option<String>,

        /// Build without the `tracing` feature
        #[arg(long, default_value_t = false)]
        no_tracing: bool,
    },
}

/// Mean time of one benchmark id, e.g. `list_iter/singly_linear/1000`.
struct Measurement {
    id: String,
    mean_ns: f64,
    elements: Option<f64>,
}

/// The part of criterion's `estimates.json` the report reads.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            report_only,
            filter,
            no_tracing,
        } => {
            if !report_only {
                run_benchmarks(quick, filter.as_deref(), no_tracing)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, filter: Option<&str>, no_tracing: bool) -> Result<()> {
    println!("Compiling {BENCH}...");
    let mut build = Command::new("cargo");
    build.args(["build", "--bench", BENCH, "--release"]);
    if no_tracing {
        build.arg("--no-default-features");
    }
    if !build.status().context("spawning cargo build")?.success() {
        bail!("Failed to compile benchmarks");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0").args(["bench", "--bench", BENCH]);
    if no_tracing {
        cmd.arg("--no-default-features");
    }

    // Criterion arguments go after `--`.
    cmd.arg("--");
    if let Some(filter) = filter {
        cmd.arg(filter);
    }
    if quick {
        cmd.args(["--measurement-time", "0.1", "--sample-size", "10", "--noplot"]);
    }

    let status = cmd.status().context("spawning cargo bench")?;
    if !status.success() {
        bail!("{BENCH} failed");
    }
    println!("Finished {BENCH} in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    let criterion_dir = Path::new(CRITERION_DIR);
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut measurements = Vec::new();
    collect_results(criterion_dir, criterion_dir, &mut measurements)?;

    // group -> measurements
    let mut groups: BTreeMap<String, Vec<Measurement>> = BTreeMap::new();
    for m in measurements {
        let group = m.id.split('/').next().unwrap_or_default().to_owned();
        groups.entry(group).or_default().push(m);
    }

    let mut report = String::from("# strand benchmark report\n");
    for (group, mut rows) in groups {
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        let fastest = rows.iter().map(|m| m.mean_ns).fold(f64::INFINITY, f64::min);

        writeln!(report, "\n## {group}\n")?;
        writeln!(report, "| Benchmark | Mean | Ops/s | vs fastest |")?;
        writeln!(report, "|---|---|---|---|")?;
        for row in rows {
            let name = row.id.strip_prefix(&format!("{group}/")).unwrap_or(&row.id);
            let ops = row.elements.unwrap_or(1.0) * 1e9 / row.mean_ns;
            writeln!(
                report,
                "| {name} | {} | {} | **{:.2}x** |",
                format_time(row.mean_ns),
                format_ops(ops),
                row.mean_ns / fastest
            )?;
        }
    }

    let report_path = PathBuf::from(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&report_path, report).with_context(|| format!("writing {}", report_path.display()))?;
    println!("Report written to {}", report_path.display());
    Ok(())
}

/// Walks criterion output; each `<id>/new/estimates.json` is one measurement.
fn collect_results(root: &Path, dir: &Path, out: &mut Vec<Measurement>) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) == Some("report") {
            continue;
        }
        let estimates = path.join("new").join("estimates.json");
        if estimates.is_file() {
            if let Some(m) = read_measurement(root, &path, &estimates)? {
                out.push(m);
            }
        }
        collect_results(root, &path, out)?;
    }
    Ok(())
}

fn read_measurement(root: &Path, bench_dir: &Path, estimates: &Path) -> Result<Option<Measurement>> {
    let content = fs::read_to_string(estimates).with_context(|| format!("reading {}", estimates.display()))?;
    let parsed: Estimates =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", estimates.display()))?;
    let mean_ns = parsed.mean.point_estimate;
    if mean_ns <= 0.0 {
        return Ok(None);
    }

    let elements = fs::read_to_string(bench_dir.join("new").join("benchmark.json"))
        .ok()
        .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
        .and_then(|j| j.pointer("/throughput/Elements").and_then(serde_json::Value::as_f64));

    let id = bench_dir
        .strip_prefix(root)?
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/");
    Ok(Some(Measurement { id, mean_ns, elements }))
}

fn format_time(ns: f64) -> String {
    if ns >= 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.2} µs", ns / 1e3)
    } else {
        format!("{ns:.1} ns")
    }
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}
