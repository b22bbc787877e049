use clap::{Parser, Subcommand, ValueEnum};
use dc_column::{
    ColumnError, ColumnTrajectory, DistillationColumn, MaterialBalance, mccabe_thiele,
    uniform_grid,
};
use dc_project::{ColumnFile, ProjectError, StartDef, compile_column, sim_options};
use dc_thermo::VaporLiquidEquilibrium;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Column(#[from] ColumnError),

    #[error("Validation failed: {0}")]
    Validation(#[from] dc_project::ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dc-cli")]
#[command(about = "Dynamic binary distillation column simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a column file
    Validate {
        /// Path to the column YAML or JSON file
        file: PathBuf,
    },
    /// Run a transient simulation
    Run {
        /// Path to the column YAML or JSON file
        file: PathBuf,
        /// Simulated time (overrides the file's run.duration)
        #[arg(long)]
        duration: Option<f64>,
        /// Number of evenly spaced output intervals (overrides run.samples)
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve and print the steady-state profile
    Steady {
        /// Path to the column YAML or JSON file
        file: PathBuf,
    },
    /// Export McCabe-Thiele point sequences as JSON
    MccabeThiele {
        /// Path to the column YAML or JSON file
        file: PathBuf,
        /// Liquid grid spacing for the equilibrium curve
        #[arg(long, default_value_t = 0.01)]
        step: f64,
        /// Use the steady-state profile instead of the end of a transient run
        #[arg(long)]
        from_steady: bool,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Run {
            file,
            duration,
            samples,
            format,
            output,
        } => cmd_run(&file, duration, samples, format, output.as_deref()),
        Commands::Steady { file } => cmd_steady(&file),
        Commands::MccabeThiele {
            file,
            step,
            from_steady,
            output,
        } => cmd_mccabe_thiele(&file, step, from_steady, output.as_deref()),
    }
}

fn load(path: &Path) -> CliResult<(ColumnFile, DistillationColumn)> {
    let file = dc_project::load(path)?;
    let column = compile_column(&file.column)?;
    Ok((file, column))
}

fn write_output(content: &str, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!("✓ Wrote {}", path.display());
    } else {
        print!("{content}");
    }
    Ok(())
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating column file: {}", path.display());
    let (file, column) = load(path)?;
    println!("✓ {} is valid", file.name);
    println!("  Stages: {}", column.num_stages());
    println!("  Equilibrium: {}", column.equilibrium().name());
    Ok(())
}

fn simulate(file: &ColumnFile, column: &DistillationColumn, duration: f64) -> CliResult<ColumnTrajectory> {
    let initial = match file.run.start {
        StartDef::Analytic => None,
        StartDef::SteadyState => Some(column.steady_state()?),
    };
    let opts = sim_options(&file.run);
    Ok(column.run_simulation_with(duration, initial, &opts)?)
}

#[derive(Serialize)]
struct RunOutput {
    name: String,
    stages: Vec<String>,
    times: Vec<f64>,
    holdups: Vec<Vec<f64>>,
    compositions: Vec<Vec<f64>>,
    accepted_steps: usize,
    rejected_steps: usize,
    rhs_evals: usize,
}

fn cmd_run(
    path: &Path,
    duration: Option<f64>,
    samples: Option<usize>,
    format: OutputFormat,
    output: Option<&Path>,
) -> CliResult<()> {
    let (file, column) = load(path)?;
    let duration = duration.unwrap_or(file.run.duration);
    let samples = samples.unwrap_or(file.run.samples);

    let start = Instant::now();
    let run = simulate(&file, &column, duration)?;
    let stats = run.stats();
    eprintln!(
        "✓ Simulated {:.3} time units in {:.3}s ({} steps, {} rejected)",
        duration,
        start.elapsed().as_secs_f64(),
        stats.accepted_steps,
        stats.rejected_steps
    );
    eprintln!(
        "  Top x = {:.4}, bottom x = {:.4}",
        run.top_composition(),
        run.bottom_composition()
    );

    let n = column.num_stages();
    let sampled = run.sample(samples);
    let labels = column.stage_labels();

    let content = match format {
        OutputFormat::Csv => {
            let mut csv = String::from("time");
            for prefix in ["m", "x"] {
                for label in &labels {
                    csv.push_str(&format!(",{}_{}", prefix, label.replace(' ', "_")));
                }
            }
            csv.push('\n');
            for (t, state) in &sampled {
                csv.push_str(&t.to_string());
                for v in state.iter() {
                    csv.push_str(&format!(",{v}"));
                }
                csv.push('\n');
            }
            csv
        }
        OutputFormat::Json => {
            let out = RunOutput {
                name: file.name.clone(),
                stages: labels,
                times: sampled.iter().map(|(t, _)| *t).collect(),
                holdups: sampled
                    .iter()
                    .map(|(_, s)| s.as_slice()[..n].to_vec())
                    .collect(),
                compositions: sampled
                    .iter()
                    .map(|(_, s)| s.as_slice()[n..].to_vec())
                    .collect(),
                accepted_steps: stats.accepted_steps,
                rejected_steps: stats.rejected_steps,
                rhs_evals: stats.rhs_evals,
            };
            serde_json::to_string_pretty(&out)? + "\n"
        }
    };

    write_output(&content, output)
}

fn cmd_steady(path: &Path) -> CliResult<()> {
    let (file, column) = load(path)?;
    println!("Steady state for: {}", file.name);

    let state = column.steady_state()?;
    let (m, x) = column.split_state(&state)?;
    let y = column
        .equilibrium()
        .vapor_fractions(x)
        .map_err(ColumnError::from)?;

    println!("  {:<12} {:>12} {:>10} {:>10}", "stage", "holdup", "x", "y");
    for (i, label) in column.stage_labels().iter().enumerate() {
        println!("  {:<12} {:>12.4} {:>10.5} {:>10.5}", label, m[i], x[i], y[i]);
    }

    let balance = MaterialBalance::evaluate(&column, 0.0, &state)?;
    println!("\nMaterial balance:");
    println!("  Feed:       {:.4} (light {:.4})", balance.feed, balance.light_feed);
    println!(
        "  Distillate: {:.4} (light {:.4})",
        balance.distillate, balance.light_distillate
    );
    println!(
        "  Bottoms:    {:.4} (light {:.4})",
        balance.bottoms, balance.light_bottoms
    );
    println!("  Light-component imbalance: {:.3e}", balance.light_imbalance());
    Ok(())
}

#[derive(Serialize)]
struct DiagramOutput {
    equilibrium: Vec<(f64, f64)>,
    staircase: Vec<(f64, f64)>,
    operating_line: Vec<(f64, f64)>,
}

fn cmd_mccabe_thiele(
    path: &Path,
    step: f64,
    from_steady: bool,
    output: Option<&Path>,
) -> CliResult<()> {
    let (file, column) = load(path)?;

    let state = if from_steady {
        column.steady_state()?
    } else {
        simulate(&file, &column, file.run.duration)?.final_state().clone()
    };
    let (_, stages) = column.split_state(&state)?;

    let grid = uniform_grid(step)?;
    let diagram = mccabe_thiele(&column, &grid, stages)?;

    let out = DiagramOutput {
        equilibrium: diagram.equilibrium,
        staircase: diagram.staircase,
        operating_line: diagram.operating_line,
    };
    write_output(&(serde_json::to_string_pretty(&out)? + "\n"), output)
}
