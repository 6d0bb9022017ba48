//! fbdivider CLI - DC-DC feedback divider calculation from the command line.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fbdivider::{
    format_ohms, keyword_link, mpn, parse_resistance, search_link, CalcOptions, CalculationReport,
    DividerSpec, ESeries, FbDividerError, FeedbackCalculator, MatchResult, Package, PurchaseRow,
    SearchMode, StandardSeries, Tolerance, Vendor,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fbdivider")]
#[command(about = "DC-DC feedback divider calculator with standard resistor matching", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the divider and rank standard-value combinations
    Calc {
        /// Target output voltage in volts
        #[arg(long)]
        vout: f64,

        /// Chip feedback reference voltage in volts
        #[arg(long)]
        vfb: f64,

        /// Pin the upper resistor (e.g. 100k) and solve R2
        #[arg(long, value_parser = parse_ohms, conflicts_with = "r2", required_unless_present = "r2")]
        r1: Option<f64>,

        /// Pin the lower resistor (e.g. 10k) and solve R1
        #[arg(long, value_parser = parse_ohms)]
        r2: Option<f64>,

        /// Resistor series: E12, E24, E48, E96 or E24+E96
        #[arg(short, long)]
        series: Option<ESeries>,

        /// Which resistors may move to standard values
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Number of combinations to show
        #[arg(short = 'n', long = "top")]
        top: Option<usize>,

        /// Chip size for part numbers
        #[arg(long)]
        package: Option<Package>,

        /// Tolerance for part numbers (0.1%, 0.5%, 1%, 5%)
        #[arg(long)]
        tolerance: Option<Tolerance>,

        /// Show vendor links for rows with |error| below this percentage
        #[arg(long)]
        threshold: Option<f64>,

        /// Vendor to link (repeatable): digikey, mouser, lcsc, mouser_cn, digikey_cn
        #[arg(long = "vendor", value_name = "VENDOR")]
        vendors: Vec<Vendor>,

        /// JSON file with default options
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with code 2 if the best match is off by more than this percentage
        #[arg(long, value_name = "PCT")]
        fail_above: Option<f64>,
    },

    /// Print the Yageo part number and vendor links for a resistance
    Mpn {
        /// Resistance, e.g. 10k, 4k7, 31.6k, 100R
        #[arg(value_name = "VALUE", value_parser = parse_ohms)]
        value: f64,

        #[arg(long, default_value = "0402")]
        package: Package,

        #[arg(long, default_value = "1%")]
        tolerance: Tolerance,

        /// Also print distributor search links
        #[arg(short, long)]
        links: bool,
    },

    /// List the values of a resistor series
    Series {
        /// E12, E24, E48, E96 or E24+E96
        #[arg(value_name = "SERIES")]
        series: ESeries,

        /// Scale the mantissas to this decade (3 gives 1k..9.76k)
        #[arg(short, long)]
        decade: Option<i32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Keep the pinned resistor, pick the companion from the series
    Fixed,
    /// Pick both resistors from the series
    Pair,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fixed => SearchMode::Fixed,
            ModeArg::Pair => SearchMode::Pair,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    Human,
    /// JSON for scripts
    Json,
}

/// Options given on the command line, applied over the config file.
struct CalcOverrides {
    series: Option<ESeries>,
    mode: Option<ModeArg>,
    top: Option<usize>,
    package: Option<Package>,
    tolerance: Option<Tolerance>,
    threshold: Option<f64>,
    vendors: Vec<Vendor>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Calc {
            vout,
            vfb,
            r1,
            r2,
            series,
            mode,
            top,
            package,
            tolerance,
            threshold,
            vendors,
            config,
            format,
            fail_above,
        } => {
            let spec = match (r1, r2) {
                (Some(r1), _) => DividerSpec::with_fixed_r1(vout, vfb, r1),
                (None, Some(r2)) => DividerSpec::with_fixed_r2(vout, vfb, r2),
                (None, None) => {
                    eprintln!("Error: one of --r1 or --r2 is required");
                    process::exit(1);
                }
            };
            let overrides = CalcOverrides {
                series,
                mode,
                top,
                package,
                tolerance,
                threshold,
                vendors,
            };
            handle_calc(&spec, config, overrides, format, fail_above)
        }
        Commands::Mpn {
            value,
            package,
            tolerance,
            links,
        } => handle_mpn(value, package, tolerance, links),
        Commands::Series { series, decade } => {
            handle_series(series, decade);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_ohms(s: &str) -> Result<f64, String> {
    parse_resistance(s).ok_or_else(|| format!("'{s}' is not a resistance (try 10k, 4k7, 100R)"))
}

fn build_options(
    config: Option<PathBuf>,
    overrides: CalcOverrides,
) -> Result<CalcOptions, FbDividerError> {
    let mut options = match config {
        Some(path) => CalcOptions::from_file(&path)?,
        None => CalcOptions::default(),
    };
    if let Some(series) = overrides.series {
        options.series = series;
    }
    if let Some(mode) = overrides.mode {
        options.mode = mode.into();
    }
    if let Some(top) = overrides.top {
        options.top_k = top;
    }
    if let Some(package) = overrides.package {
        options.package = package;
    }
    if let Some(tolerance) = overrides.tolerance {
        options.tolerance = tolerance;
    }
    if let Some(threshold) = overrides.threshold {
        options.link_threshold_pct = threshold;
    }
    if !overrides.vendors.is_empty() {
        options.vendors = overrides.vendors;
    }
    options.validate()?;
    Ok(options)
}

fn handle_calc(
    spec: &DividerSpec,
    config: Option<PathBuf>,
    overrides: CalcOverrides,
    format: OutputFormat,
    fail_above: Option<f64>,
) -> i32 {
    let options = match build_options(config, overrides) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match FeedbackCalculator::calculate(spec, &options) {
        Ok(report) => {
            let code = match format {
                OutputFormat::Human => {
                    output_human(&report);
                    0
                }
                OutputFormat::Json => output_json(&report),
            };
            if code != 0 {
                return code;
            }
            if let Some(limit) = fail_above {
                if should_fail(&report, limit) {
                    return 2;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(report: &CalculationReport, limit_pct: f64) -> bool {
    match report.best() {
        Some(best) => best.error_pct.abs() > limit_pct,
        None => true,
    }
}

fn output_human(report: &CalculationReport) {
    let spec = &report.spec;
    println!(
        "\nFeedback divider: Vout = {} V, Vfb = {} V, {} fixed at {}",
        spec.vout,
        spec.vfb,
        spec.fixed,
        format_ohms(spec.fixed_value)
    );
    println!("Series: {} ({} search)", report.series, report.mode);
    println!("{}", "─".repeat(60));
    println!(
        "  Ideal {}: {}",
        report.ideal.resistor,
        format_ohms(report.ideal.ohms)
    );

    println!(
        "\n  {:>2}  {:<10}  {:<10}  {:>9}  {:>8}  {:<18}  {:<18}",
        "#", "R1", "R2", "Vout (V)", "Error", "R1 MPN", "R2 MPN"
    );
    for (i, m) in report.matches.iter().enumerate() {
        let mark = if m.links.is_some() { "*" } else { " " };
        println!(
            "{} {:>2}  {:<10}  {:<10}  {:>9.4}  {:>+7.3}%  {:<18}  {:<18}",
            mark,
            i + 1,
            format_ohms(m.r1),
            format_ohms(m.r2),
            m.actual_vout,
            m.error_pct,
            m.mpn_r1,
            m.mpn_r2
        );
    }

    if !report.has_recommendation() {
        println!(
            "\n  No combination within ±{}%; adjust Vout, Vfb or the fixed resistor.",
            report.link_threshold_pct
        );
        return;
    }

    println!("\n  Recommended (|error| < {}%):", report.link_threshold_pct);
    for (i, m) in report.recommended().enumerate() {
        print_recommendation(i + 1, m);
    }

    let rows = FeedbackCalculator::purchase_list(report);
    if !rows.is_empty() {
        println!("\n  Purchase list (stock and price are not queried):");
        for row in &rows {
            println!("    {:<18}  {:<15}  {}", row.mpn, row.vendor.display_name(), row.url);
        }
    }
}

fn print_recommendation(index: usize, m: &MatchResult) {
    println!(
        "    {}. R1 = {}, R2 = {}, Vout = {:.4} V, error = {:+.3}%",
        index,
        format_ohms(m.r1),
        format_ohms(m.r2),
        m.actual_vout,
        m.error_pct
    );
    let Some(links) = &m.links else { return };
    for (label, part, links) in [("R1", &m.mpn_r1, &links.r1), ("R2", &m.mpn_r2, &links.r2)] {
        println!("       {} {}", label, part);
        for link in links {
            println!("         {}: {}", link.vendor.display_name(), link.url);
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a CalculationReport,
    purchase_list: Vec<PurchaseRow>,
}

fn output_json(report: &CalculationReport) -> i32 {
    print_json(&JsonOutput {
        report,
        purchase_list: FeedbackCalculator::purchase_list(report),
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_mpn(value: f64, package: Package, tolerance: Tolerance, links: bool) -> i32 {
    let part = match mpn(value, package, tolerance) {
        Ok(part) => part,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    println!("{}", part);
    if links {
        for vendor in Vendor::ALL {
            println!("  {}: {}", vendor.display_name(), search_link(vendor, &part));
        }
        for vendor in [Vendor::Digikey, Vendor::Mouser, Vendor::Lcsc] {
            if let Ok(url) = keyword_link(vendor, value) {
                println!("  {} (by value): {}", vendor.display_name(), url);
            }
        }
    }
    0
}

fn handle_series(series: ESeries, decade: Option<i32>) {
    println!("{} ({} values per decade):\n", series, series.per_decade());
    match decade {
        Some(exp) => {
            let values = StandardSeries::new(series).candidates_in_decades(exp, exp);
            for chunk in values.chunks(8) {
                let line: Vec<String> = chunk
                    .iter()
                    .map(|c| format!("{:<10}", format_ohms(c.value)))
                    .collect();
                println!("  {}", line.join(" "));
            }
        }
        None => {
            for chunk in series.base_values().chunks(12) {
                let line: Vec<String> = chunk.iter().map(|v| format!("{:.2}", v)).collect();
                println!("  {}", line.join("  "));
            }
        }
    }
}
