//! magcal CLI — command-line interface for 2-axis magnetometer calibration.

mod io;

use clap::{Args, Parser, Subcommand};
use magcal::{calibrate, Calibration, EllipseGeometry, FitConfig, PointSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "magcal")]
#[command(about = "Fit an ellipse to raw 2-axis magnetometer samples and derive the calibration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a calibration to a CSV of raw samples.
    Fit(CliFitArgs),

    /// Write synthetic raw samples on a known ellipse.
    Synth(CliSynthArgs),
}

#[derive(Debug, Clone, Args)]
struct CliFitArgs {
    /// Path to the input CSV (with a header row).
    #[arg(long)]
    input: PathBuf,

    /// Header label of the x column.
    #[arg(long, default_value = "x")]
    x_col: String,

    /// Header label of the y column.
    #[arg(long, default_value = "y")]
    y_col: String,

    /// Fit configuration (JSON). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fit in raw coordinates, without centroid/scale normalization.
    #[arg(long)]
    no_normalize: bool,

    /// Minimum number of samples required.
    #[arg(long)]
    min_points: Option<usize>,

    /// Print the full result (conic, geometry, transform, quality) as JSON.
    #[arg(long)]
    json: bool,

    /// Path to write the corrected samples (CSV), e.g. for plotting.
    #[arg(long)]
    corrected_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliSynthArgs {
    /// Path to write the samples (CSV with x,y header).
    #[arg(long)]
    out: PathBuf,

    /// Ellipse center x.
    #[arg(long, default_value = "2.0", allow_hyphen_values = true)]
    cx: f64,

    /// Ellipse center y.
    #[arg(long, default_value = "-3.0", allow_hyphen_values = true)]
    cy: f64,

    /// Semi-major axis.
    #[arg(long, default_value = "5.0")]
    a: f64,

    /// Semi-minor axis.
    #[arg(long, default_value = "2.0")]
    b: f64,

    /// Major-axis rotation in degrees.
    #[arg(long, default_value = "30.0", allow_hyphen_values = true)]
    phi_deg: f64,

    /// Number of samples.
    #[arg(long, default_value = "100")]
    n: usize,

    /// Half-width of uniform noise added to each coordinate.
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// RNG seed for the noise.
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl CliFitArgs {
    fn to_config(&self) -> CliResult<FitConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading fit config: {}", path.display());
                FitConfig::from_json_file(path)?
            }
            None => FitConfig::default(),
        };
        if self.no_normalize {
            config.normalize = false;
        }
        if let Some(min_points) = self.min_points {
            config.min_points = min_points;
        }
        Ok(config)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fit(args) => run_fit(&args),
        Commands::Synth(args) => run_synth(&args),
    }
}

fn run_fit(args: &CliFitArgs) -> CliResult<()> {
    let config = args.to_config()?;

    tracing::info!("Loading samples: {}", args.input.display());
    let (xs, ys) = io::read_columns_file(&args.input, &args.x_col, &args.y_col)?;
    let points = PointSet::from_columns(&xs, &ys)?;
    tracing::info!("Loaded {} samples", points.len());

    let cal = calibrate(&points, &config)?;
    tracing::info!(
        "Corrected radius: min {:.4}, max {:.4}, mean {:.4}",
        cal.quality.corrected_radius.min,
        cal.quality.corrected_radius.max,
        cal.quality.corrected_radius.mean
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cal)?);
    } else {
        print_summary(&cal);
    }

    if let Some(path) = &args.corrected_out {
        io::write_points_file(path, &cal.corrected)?;
        tracing::info!("Corrected samples written to {}", path.display());
    }

    Ok(())
}

fn print_summary(cal: &Calibration) {
    let g = &cal.geometry;
    let q = &cal.transform.matrix;
    println!(
        "X0, Y0, a, b, phi (degrees): [{:.2} {:.2} {:.2} {:.2} {:.2}]",
        g.x0,
        g.y0,
        g.a,
        g.b,
        g.phi.to_degrees()
    );
    println!();
    println!(
        "offset to subtract from raw data (x0,y0) {:.2} {:.2}",
        cal.transform.offset[0], cal.transform.offset[1]
    );
    println!("Correction matrix to apply to offset data");
    println!("[[{:>12.8} {:>12.8}]", q[0][0], q[0][1]);
    println!(" [{:>12.8} {:>12.8}]]", q[1][0], q[1][1]);
}

fn run_synth(args: &CliSynthArgs) -> CliResult<()> {
    if !(args.a >= args.b && args.b > 0.0) {
        return Err(format!("need a >= b > 0, got a={} b={}", args.a, args.b).into());
    }
    let truth = EllipseGeometry {
        x0: args.cx,
        y0: args.cy,
        a: args.a,
        b: args.b,
        phi: args.phi_deg.to_radians(),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let points: Vec<[f64; 2]> = truth
        .sample_points(args.n)
        .into_iter()
        .map(|[x, y]| {
            if args.noise > 0.0 {
                [
                    x + rng.gen_range(-args.noise..=args.noise),
                    y + rng.gen_range(-args.noise..=args.noise),
                ]
            } else {
                [x, y]
            }
        })
        .collect();

    io::write_points_file(&args.out, &points)?;
    tracing::info!("{} samples written to {}", points.len(), args.out.display());
    Ok(())
}
