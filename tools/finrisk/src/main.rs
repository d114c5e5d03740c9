use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use medi_data::{BundleSource, ClinicalSource};
use medi_risk::{
    compute_risk, CheckPair, ClinicalRecord, ManualInput, PatientProfile, ProfileAssembler,
    RiskResult, ValidationReport,
};
use serde_json::json;

pub mod config;

use config::{Config, OutputMode};

#[derive(Debug, Parser)]
#[command(
    name = "finrisk",
    version,
    about = "Stroke and coronary heart disease risk from FHIR records",
    long_about = "finrisk estimates a patient's risk of heart attack and stroke.\n\n\
        Commands:\n  \
        patients  List the patients in the record source\n  \
        assess    Validate the manual factors and compute the risk\n\n\
        Settings are read from finrisk.toml when present; flags override them."
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// FHIR bundle file or directory of bundles
    #[arg(long, global = true, value_name = "PATH")]
    bundle: Option<PathBuf>,

    /// Configuration file (defaults to ./finrisk.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List patient ids
    Patients,
    /// Compute a patient's risk
    Assess(AssessArgs),
}

#[derive(Debug, Args)]
struct AssessArgs {
    /// Patient id
    id: String,

    /// Check the "smoker" box
    #[arg(long)]
    smoker: bool,

    /// Check the "non-smoker" box
    #[arg(long)]
    non_smoker: bool,

    /// Check the "diabetic" box
    #[arg(long)]
    diabetic: bool,

    /// Check the "non-diabetic" box
    #[arg(long)]
    non_diabetic: bool,

    /// Replace the pre-filled name
    #[arg(long, value_name = "TEXT")]
    name: Option<String>,

    /// Replace the pre-filled age
    #[arg(long, value_name = "YEARS")]
    age: Option<String>,

    /// Replace the pre-filled systolic blood pressure (mmHg)
    #[arg(long, value_name = "MMHG")]
    bp: Option<String>,

    /// Replace the pre-filled total cholesterol (mmol/L)
    #[arg(long, value_name = "MMOL_L")]
    cholesterol: Option<String>,

    /// Replace the pre-filled HDL cholesterol (mmol/L)
    #[arg(long, value_name = "MMOL_L")]
    hdl: Option<String>,

    /// Reference date for the patient's age (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = PathBuf::from(".");
    let config = match config::load_config(cli.config.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    let ctx = Context {
        bundle: cli.bundle.or(config.bundle.clone()),
        config,
    };
    let rc = match cli.command {
        Command::Patients => run_patients(&ctx),
        Command::Assess(args) => run_assess(&ctx, &args),
    };
    std::process::exit(rc);
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

struct Context {
    bundle: Option<PathBuf>,
    config: Config,
}

impl Context {
    fn open_source(&self) -> Result<BundleSource, i32> {
        let Some(path) = self.bundle.as_deref() else {
            eprintln!("error: no record source (pass --bundle or set 'bundle' in {})", config::CONFIG_FILE);
            return Err(2);
        };
        open_bundle(path)
    }
}

fn open_bundle(path: &Path) -> Result<BundleSource, i32> {
    match BundleSource::open(path) {
        Ok(source) => {
            log::info!("{}: {} patients", path.display(), source.len());
            Ok(source)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(2)
        }
    }
}

fn run_patients(ctx: &Context) -> i32 {
    let source = match ctx.open_source() {
        Ok(s) => s,
        Err(rc) => return rc,
    };
    let ids = match source.list_patient_ids() {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    match ctx.config.output {
        OutputMode::Json => println!("{}", json!(ids)),
        OutputMode::Text => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    0
}

fn run_assess(ctx: &Context, args: &AssessArgs) -> i32 {
    let source = match ctx.open_source() {
        Ok(s) => s,
        Err(rc) => return rc,
    };
    let mut assembler = ProfileAssembler::new(&source).codes(ctx.config.codes.clone());
    if let Some(today) = args.today {
        assembler = assembler.today(today);
    }
    let record = match assembler.clinical_record(&args.id) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    let form = fill_form(&record, args);
    let report = form.validate();
    eprint!("{report}");
    let profile = match form.apply(record) {
        Ok(p) => p,
        Err(_) => {
            eprintln!("error: fix the manual input and try again");
            return 1;
        }
    };

    let result = compute_risk(&profile);
    let mode = if args.json {
        OutputMode::Json
    } else {
        ctx.config.output
    };
    print!("{}", render_assessment(&profile, &result, &report, mode));
    0
}

fn fill_form(record: &ClinicalRecord, args: &AssessArgs) -> ManualInput {
    let mut form = ManualInput::prefilled(record);
    form.smoking = CheckPair {
        yes: args.smoker,
        no: args.non_smoker,
    };
    form.diabetes = CheckPair {
        yes: args.diabetic,
        no: args.non_diabetic,
    };
    let overrides = [
        (&mut form.name, &args.name),
        (&mut form.age, &args.age),
        (&mut form.blood_pressure, &args.bp),
        (&mut form.cholesterol, &args.cholesterol),
        (&mut form.hdl, &args.hdl),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    form
}

fn render_assessment(
    profile: &PatientProfile,
    result: &RiskResult,
    report: &ValidationReport,
    mode: OutputMode,
) -> String {
    match mode {
        OutputMode::Json => {
            let doc = json!({
                "patient": profile,
                "risk": result,
                "warnings": report.messages(),
            });
            format!("{doc:#}\n")
        }
        OutputMode::Text => format!(
            "{} ({}), {}, age {}\n{result}\n\n{}",
            profile.display_name(),
            profile.id(),
            profile.gender(),
            profile.age(),
            result.render_bars()
        ),
    }
}
