//! BoardGuard CLI - PCB design rule checking from the command line.

use boardguard::{
    BoardGuardCore, DesignRules, RulePreset, Severity, ValidationOptions, ValidationResult,
    Violation,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "boardguard")]
#[command(about = "PCB design rule checking tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress details to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct RuleArgs {
    /// Built-in rule preset applied over the base rules
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// JSON rule table used instead of the standard defaults
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Override a single rule, e.g. --set minClearance=0.2
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, f64)>,

    /// Find close pairs with a spatial index
    #[arg(long)]
    indexed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run DRC on a single board file
    Check {
        /// Path to a board file (JSON array of object records)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if violations found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Run DRC on every *.pcb.json board in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if violations found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// List design rules and their values
    Rules {
        /// Show the values of this preset instead of the defaults
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,

        /// Show rule descriptions
        #[arg(short, long)]
        details: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Conservative,
    Standard,
    Aggressive,
}

impl From<PresetArg> for RulePreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Conservative => RulePreset::Conservative,
            PresetArg::Standard => RulePreset::Standard,
            PresetArg::Aggressive => RulePreset::Aggressive,
        }
    }
}

fn parse_override(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if DesignRules::default().get_rule(key).is_none() {
        return Err(format!("unknown rule '{}'", key));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}' for rule '{}'", value, key))?;
    Ok((key.to_string(), value))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
            rules,
        } => handle_check(&file, format, fail_on, rules),
        Commands::Project {
            dir,
            format,
            fail_on,
            rules,
        } => handle_project(&dir, format, fail_on, rules),
        Commands::Rules { preset, details } => {
            handle_rules(preset, details);
            0
        }
    };

    process::exit(exit_code);
}

fn build_options(args: RuleArgs) -> ValidationOptions {
    ValidationOptions {
        preset: args.preset.map(RulePreset::from),
        rules_file: args.rules,
        overrides: args.overrides,
        indexed: args.indexed,
        ..Default::default()
    }
}

fn handle_check(
    file: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    rules: RuleArgs,
) -> i32 {
    let options = build_options(rules);

    match BoardGuardCore::validate_board(file, &options) {
        Ok(validation) => {
            let results = [validation];
            output_results(&results, format);
            exit_code_for(&results, fail_on)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_project(
    dir: &Path,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    rules: RuleArgs,
) -> i32 {
    let options = build_options(rules);

    match BoardGuardCore::validate_project(dir, &options) {
        Ok(results) => {
            output_results(&results, format);
            exit_code_for(&results, fail_on)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn exit_code_for(results: &[ValidationResult], fail_on: Option<FailOnSeverity>) -> i32 {
    match fail_on {
        Some(severity) if results.iter().any(|r| should_fail(r, severity)) => 1,
        _ => 0,
    }
}

fn should_fail(result: &ValidationResult, severity: FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => result.has_errors(),
        FailOnSeverity::Warning => result.has_warnings_or_errors(),
    }
}

fn output_results(results: &[ValidationResult], format: OutputFormat) {
    match format {
        OutputFormat::Human => output_human(results),
        OutputFormat::Json => output_json(results),
        OutputFormat::Github => output_github(results),
    }
}

fn print_group(title: &str, violations: &[&Violation]) {
    if violations.is_empty() {
        return;
    }
    println!("\n  {}:", title);
    for v in violations {
        println!("    - [{}] {}", v.violation_type, v.message);
        println!(
            "      at ({:.3}, {:.3}) objects: {}",
            v.position.x,
            v.position.y,
            v.object_ids.join(", ")
        );
    }
}

fn output_human(results: &[ValidationResult]) {
    for result in results {
        println!("\nFile: {}", result.file.display());
        println!("{}", "─".repeat(60));

        if result.total_issues() == 0 {
            println!("  No violations found ({} objects checked)", result.stats.objects);
            continue;
        }

        let (errors, warnings): (Vec<&Violation>, Vec<&Violation>) = result
            .violations
            .iter()
            .partition(|v| v.severity == Severity::Error);

        print_group("ERRORS", &errors);
        print_group("WARNINGS", &warnings);

        println!("\n  Summary:");
        println!("    Objects:  {}", result.stats.objects);
        println!("    Errors:   {}", result.stats.errors);
        println!("    Warnings: {}", result.stats.warnings);
    }
}

fn output_json(results: &[ValidationResult]) {
    let output = serde_json::json!({
        "results": results.iter().map(|r| {
            serde_json::json!({
                "file": r.file.display().to_string(),
                "violations": r.violations,
                "stats": r.stats,
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_violations": results.iter().map(|r| r.total_issues()).sum::<usize>(),
            "errors": results.iter().map(|r| r.stats.errors).sum::<usize>(),
            "warnings": results.iter().map(|r| r.stats.warnings).sum::<usize>(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to encode results: {}", e),
    }
}

fn severity_to_github(violation: &Violation) -> &'static str {
    match violation.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn output_github(results: &[ValidationResult]) {
    for result in results {
        for violation in &result.violations {
            println!(
                "::{} file={},title={}::{}",
                severity_to_github(violation),
                result.file.display(),
                violation.violation_type,
                violation.message.replace('\n', " ")
            );
        }
    }
}

fn describe_rule(key: &str) -> &'static str {
    match key {
        "minTraceWidth" => "Narrowest allowed trace",
        "maxTraceWidth" => "Widest allowed trace",
        "minTraceLength" => "Shorter traces are reported as degenerate",
        "minClearance" => "Generic copper-to-copper spacing",
        "minViaClearance" => "Spacing when either feature is a via",
        "minPadClearance" => "Spacing when either feature is a pad",
        "minViaSize" => "Smallest via outer diameter",
        "maxViaSize" => "Largest via outer diameter",
        "minViaDrill" => "Smallest via drill",
        "minAnnularRing" => "Copper left around a via or pad drill",
        "minDrillSize" => "Smallest pad drill",
        "maxDrillSize" => "Largest pad drill",
        "minPadSize" => "Smallest pad dimension",
        "minHoleToHoleSpacing" => "Spacing between drilled holes",
        "minBoardEdgeClearance" => "Copper distance from the board outline",
        "minSilkscreenWidth" => "Narrowest silkscreen line",
        "minSolderMaskClearance" => "Solder mask expansion around pads",
        "minThermalSpokeWidth" => "Narrowest thermal relief spoke",
        "maxAspectRatio" => "Board thickness over drill diameter",
        "boardThickness" => "Finished board thickness",
        _ => "",
    }
}

fn handle_rules(preset: Option<PresetArg>, details: bool) {
    let rules = match preset {
        Some(p) => DesignRules::from_preset(p.into()),
        None => DesignRules::default(),
    };
    let name = preset.map(RulePreset::from).unwrap_or(RulePreset::Standard);
    println!("Design rules ({} preset):\n", name);

    for (key, value) in rules.entries() {
        println!("  {:<24} {}", key, value);
        if details {
            println!("    {}", describe_rule(key));
        }
    }
}
