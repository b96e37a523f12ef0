use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use generator::profile::{write_survey, GeneratorConfig};
use geosweep::prelude::SearchStrategy;
use geosweep::processing::CorrelationOutcome;
use geosweep::RunSummary;
use output::writer::{persist, point_listing, preview};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod output;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Correlate GPS fixes with spectral sweeps")]
struct Args {
    /// GPS log with `GPS,...` lines
    #[arg(long)]
    gps_log: Option<PathBuf>,
    /// Sweep log with `time:freq_min:freq_max:powers` lines
    #[arg(long)]
    data: Option<PathBuf>,
    /// Lowest accepted band edge (MHz)
    #[arg(long)]
    min_freq: Option<i64>,
    /// Highest accepted band edge (MHz)
    #[arg(long)]
    max_freq: Option<i64>,
    /// Power samples must be strictly above this (dB)
    #[arg(long, allow_hyphen_values = true)]
    min_power: Option<f64>,
    /// Load a workflow config from YAML instead of the flags above
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Nearest-fix search: linear or binary
    #[arg(long, value_parser = parse_search)]
    search: Option<SearchStrategy>,
    /// Match sweeps on all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Write the encoded result set to a `_filtered.data` file
    #[arg(long, default_value_t = false)]
    save_data: bool,
    /// Write the observations as JSON
    #[arg(long, default_value_t = false)]
    save_json: bool,
    /// Print every matched point
    #[arg(long, default_value_t = false)]
    list: bool,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Encoded lines to preview after the run
    #[arg(long)]
    preview: Option<usize>,
    /// Write a synthetic survey.log / survey.data pair into DIR and exit
    #[arg(long, value_name = "DIR")]
    synthesize: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn parse_search(value: &str) -> Result<SearchStrategy, String> {
    match value.to_ascii_lowercase().as_str() {
        "linear" => Ok(SearchStrategy::Linear),
        "binary" => Ok(SearchStrategy::Binary),
        other => Err(format!("unknown search strategy `{}`", other)),
    }
}

/// Level forced by `-v`/`-q`; `None` leaves `RUST_LOG` in charge.
fn level_override(verbose: &Verbosity<InfoLevel>) -> Option<log::LevelFilter> {
    let level = verbose.log_level_filter();
    (level != log::LevelFilter::Info).then_some(level)
}

fn init_logging(verbose: &Verbosity<InfoLevel>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level_override(verbose) {
        builder.filter_level(level);
    }
    builder.init();
}

fn summary_line(summary: &RunSummary) -> String {
    format!(
        "Read {} GPS fixes ({} GPS lines skipped), {} measurement lines ({} pre-roll, {} malformed).",
        summary.fixes_read,
        summary.position_lines_skipped,
        summary.measurement_lines,
        summary.pre_roll_discarded,
        summary.malformed_lines
    )
}

fn build_config(args: &Args) -> anyhow::Result<WorkflowConfig> {
    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.gps_log.clone().context("--gps-log is required")?,
            args.data.clone().context("--data is required")?,
            args.min_freq.context("--min-freq is required")?,
            args.max_freq.context("--max-freq is required")?,
            args.min_power.context("--min-power is required")?,
        )?
    };

    if let Some(search) = args.search {
        config.engine.search = search;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(lines) = args.preview {
        config.preview_lines = lines;
    }
    config.engine.parallel |= args.parallel;
    config.save_data |= args.save_data;
    config.save_json |= args.save_json;
    config.list_points |= args.list;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    if let Some(dir) = &args.synthesize {
        let files = write_survey(dir, &GeneratorConfig::default())?;
        println!(
            "Synthetic survey written: {} and {}",
            files.gps_log.display(),
            files.data_log.display()
        );
        return Ok(());
    }

    let config = build_config(&args)?;
    let runner = Runner::new(config);
    let outcome = runner.execute()?;
    let config = runner.config();

    let summary = outcome.summary();
    println!("{}", summary_line(summary));

    match &outcome {
        CorrelationOutcome::Empty(_) => {
            println!("No points matched the filter; try different filter parameters.");
        }
        CorrelationOutcome::Matched(report) => {
            println!("Found {} points matching the filter.", summary.matches);
            if config.list_points {
                point_listing(&report.observations)
                    .iter()
                    .for_each(|line| println!("{}", line));
            }
            println!("Filtered data (first {} lines):", config.preview_lines);
            preview(&report.encoded, config.preview_lines)
                .iter()
                .for_each(|line| println!("{}", line));

            for path in persist(report, config)? {
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_a_config() {
        let args = Args::parse_from([
            "correlator",
            "--gps-log",
            "a.log",
            "--data",
            "b.data",
            "--min-freq",
            "430",
            "--max-freq",
            "440",
            "--min-power",
            "-62.5",
            "--search",
            "binary",
            "--parallel",
            "--save-data",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.filter.min_power_db, -62.5);
        assert_eq!(config.engine.search, SearchStrategy::Binary);
        assert!(config.engine.parallel);
        assert!(config.save_data);
        assert!(!config.save_json);
    }

    #[test]
    fn missing_filter_flags_are_reported() {
        let args = Args::parse_from(["correlator", "--gps-log", "a.log", "--data", "b.data"]);
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("--min-freq"));
    }

    #[test]
    fn verbosity_flags_override_the_environment() {
        let defaults = Args::parse_from(["correlator", "--synthesize", "out"]);
        assert_eq!(level_override(&defaults.verbose), None);

        let debug = Args::parse_from(["correlator", "-v", "--synthesize", "out"]);
        assert_eq!(level_override(&debug.verbose), Some(log::LevelFilter::Debug));

        let trace = Args::parse_from(["correlator", "-vv", "--synthesize", "out"]);
        assert_eq!(level_override(&trace.verbose), Some(log::LevelFilter::Trace));

        let warn = Args::parse_from(["correlator", "-q", "--synthesize", "out"]);
        assert_eq!(level_override(&warn.verbose), Some(log::LevelFilter::Warn));
    }

    #[test]
    fn summary_keeps_gps_and_measurement_skips_apart() {
        let summary = RunSummary {
            fixes_read: 103,
            position_lines_skipped: 17,
            measurement_lines: 203,
            pre_roll_discarded: 3,
            malformed_lines: 4,
            ..Default::default()
        };
        assert_eq!(
            summary_line(&summary),
            "Read 103 GPS fixes (17 GPS lines skipped), 203 measurement lines (3 pre-roll, 4 malformed)."
        );
    }

    #[test]
    fn unknown_search_is_rejected() {
        assert!(parse_search("quadtree").is_err());
        assert_eq!(parse_search("Linear").unwrap(), SearchStrategy::Linear);
    }
}
