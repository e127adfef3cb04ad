use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use perceptron::{
    train, BiasUpdate, CancellationToken, LossFunction, Network, NetworkConfig, TrainConfig,
};

#[derive(Parser)]
#[command(name = "perceptron", about = "Train and inspect small multilayer perceptrons")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Learn a two-input logic gate and print its truth table
    Gate {
        #[arg(value_enum)]
        gate: Gate,
        /// Hidden layer width
        #[arg(long, default_value_t = 4)]
        hidden: usize,
        #[arg(long, default_value_t = 10_000)]
        epochs: usize,
        #[arg(long, default_value_t = 1.0)]
        learning_rate: f64,
        /// Checkpoint to load from, or to write after training
        #[arg(long)]
        model: Option<PathBuf>,
        /// Train even if the checkpoint exists
        #[arg(long)]
        retrain: bool,
        /// Accumulate biases instead of overwriting them
        #[arg(long)]
        accumulate_bias: bool,
        /// Seconds between progress reports
        #[arg(long, default_value_t = 5)]
        report_every: u64,
    },
    /// Print the architecture of a saved checkpoint
    Inspect {
        model: PathBuf,
        /// JSON network config supplying hyperparameters
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Gate {
    Or,
    And,
    Nand,
    Xor,
}

impl Gate {
    fn eval(self, a: bool, b: bool) -> bool {
        match self {
            Gate::Or => a || b,
            Gate::And => a && b,
            Gate::Nand => !(a && b),
            Gate::Xor => a != b,
        }
    }

    /// The four input rows and their targets.
    fn truth_table(self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let bit = |b: bool| if b { 1.0 } else { 0.0 };
        [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .map(|(a, b)| (vec![bit(a), bit(b)], vec![bit(self.eval(a, b))]))
            .unzip()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Gate {
            gate,
            hidden,
            epochs,
            learning_rate,
            model,
            retrain,
            accumulate_bias,
            report_every,
        } => {
            let bias_update = if accumulate_bias { BiasUpdate::Accumulate } else { BiasUpdate::Overwrite };
            let config = NetworkConfig::new(vec![2, hidden, 1])
                .with_learning_rate(learning_rate)
                .with_bias_update(bias_update);
            let train_config = TrainConfig::default()
                .with_report_every(Duration::from_secs(report_every))
                .with_loss(LossFunction::MeanSquaredError);
            run_gate(gate, &config, epochs, model, retrain, &train_config)
        }
        Command::Inspect { model, config } => inspect(model, config),
    }
}

fn run_gate(
    gate: Gate,
    config: &NetworkConfig,
    epochs: usize,
    model: Option<PathBuf>,
    retrain: bool,
    train_config: &TrainConfig,
) -> Result<()> {
    let (inputs, targets) = gate.truth_table();

    let loaded = match &model {
        Some(path) if path.exists() && !retrain => match config.load_file(path) {
            Ok(network) => Some(network),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not load checkpoint, starting fresh");
                None
            }
        },
        _ => None,
    };

    let network = match loaded {
        Some(network) => {
            info!("using saved weights");
            network
        }
        None => {
            let mut network = config.build().context("building network")?;
            print!("{network}");
            let report = train(&CancellationToken::new(), &mut network, epochs, &inputs, &targets, train_config)
                .context("training")?;
            println!("Training Duration {:?}", report.duration);
            if let Some(path) = &model {
                network.save_file(path)
                    .with_context(|| format!("saving checkpoint to {}", path.display()))?;
                info!(path = %path.display(), "checkpoint saved");
            }
            network
        }
    };

    print_predictions(&network, &inputs)
}

fn inspect(model: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => NetworkConfig::load_json(&path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => NetworkConfig::default(),
    };
    let network = config.load_file(&model)
        .with_context(|| format!("loading checkpoint {}", model.display()))?;

    print!("{network}");
    for (i, layer) in network.layers().iter().enumerate() {
        let mean_bias = layer.nodes.iter().map(|n| n.bias).sum::<f64>() / layer.size() as f64;
        println!("Layer {i}: {} nodes x {} weights, mean bias {mean_bias:.4}", layer.size(), layer.input_size());
    }
    Ok(())
}

fn print_predictions(network: &Network, inputs: &[Vec<f64>]) -> Result<()> {
    for input in inputs {
        let output = network.predict(input)?;
        println!("{input:?} -> {output:.4?}");
    }
    Ok(())
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .ok();
}
