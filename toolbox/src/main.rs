use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toolbox::{
    coverage::{CoverageConfig, CoverageTracker},
    io::{final_coverage, track_runs},
    record::{AggregateRecorder, BufferedRecorder, LogRecorder, Recorder},
    shape::{conv_2d, conv_transpose_2d, pool_2d},
    stats::{save_iqm, save_median, save_performance_profile, Curves},
};

/// Exploration metrics and learning-curve statistics
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track state coverage of observation logs, one file per run
    Coverage {
        /// YAML file of the coverage config
        #[arg(long)]
        config: PathBuf,

        /// CSV file to write the coverage curves of all runs to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Observation logs
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Save the median and quantiles over runs as a .dat file
    Median {
        /// CSV file of runs, with timesteps in the header row
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Quantiles saved next to the median, e.g. 0.05 0.95
        #[arg(long, num_args = 1..)]
        quantiles: Vec<f32>,

        /// Number of timesteps after downsampling
        #[arg(long)]
        target_length: Option<usize>,
    },

    /// Save the interquartile mean over runs as a .dat file
    Iqm {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        target_length: Option<usize>,
    },

    /// Save the performance profile of all scores as a .dat file
    Profile {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Lowest threshold
        #[arg(long, allow_negative_numbers = true)]
        min: f32,

        /// Highest threshold
        #[arg(long, allow_negative_numbers = true)]
        max: f32,
    },

    /// Print the output size of a convolution or pooling layer
    Conv {
        #[arg(long)]
        input: usize,

        #[arg(long)]
        kernel: usize,

        #[arg(long)]
        stride: usize,

        #[arg(long, default_value_t = 0)]
        padding: usize,

        /// Transposed convolution
        #[arg(long, default_value_t = false)]
        transpose: bool,

        /// Extra size added to one side of the output of a transposed convolution
        #[arg(long, default_value_t = 0, requires = "transpose")]
        output_padding: usize,

        /// Pooling layer
        #[arg(long, default_value_t = false, conflicts_with = "transpose")]
        pool: bool,
    },
}

fn coverage(config: PathBuf, output: Option<PathBuf>, inputs: Vec<PathBuf>) -> Result<()> {
    let config = CoverageConfig::load(&config)?;
    let tracker = CoverageTracker::new(config)?;
    let mut runs = BufferedRecorder::new();
    let curves = track_runs(&tracker, &inputs, &mut runs)?;

    // Per-run lines, then the final coverage aggregated over runs.
    let mut recorder = LogRecorder::new("coverage");
    for record in runs.iter() {
        recorder.write(record.clone());
        recorder.store(final_coverage(record)?);
    }
    recorder.flush();

    if let Some(output) = output {
        curves.save_csv(&output)?;
        log::info!("Saved {} runs to {:?}", curves.n_runs(), output);
    }
    Ok(())
}

fn conv(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    transpose: bool,
    output_padding: usize,
    pool: bool,
) -> Result<()> {
    let size = if transpose {
        conv_transpose_2d(input, kernel, stride, padding, output_padding)?
    } else if pool {
        pool_2d(input, kernel, stride, padding)?
    } else {
        conv_2d(input, kernel, stride, padding)?
    };
    println!("{} {}", size.0[0], size.0[1]);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Coverage {
            config,
            output,
            inputs,
        } => coverage(config, output, inputs)?,
        Command::Median {
            input,
            output,
            quantiles,
            target_length,
        } => save_median(&Curves::load_csv(input)?, output, target_length, &quantiles)?,
        Command::Iqm {
            input,
            output,
            target_length,
        } => save_iqm(&Curves::load_csv(input)?, output, target_length)?,
        Command::Profile {
            input,
            output,
            min,
            max,
        } => save_performance_profile(Curves::load_csv(input)?.values.view(), min, max, output)?,
        Command::Conv {
            input,
            kernel,
            stride,
            padding,
            transpose,
            output_padding,
            pool,
        } => conv(input, kernel, stride, padding, transpose, output_padding, pool)?,
    }

    Ok(())
}
