//! Churn CLI Module
//!
//! Command-line interface for data preparation, training, serving and the
//! prediction client.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::client::{api_url_from_env, load_customer_from_json, print_result, ChurnClient};
use crate::data::{
    clean_data, get_train_test_data, load_raw_data, split_features_target, DataConfig, DataSummary,
};
use crate::preprocessing::{PreprocessingConfig, ScalerType};
use crate::training::{ClassWeight, Trainer, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "churn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Customer churn prediction: prepare, train, serve, predict")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load, clean and split the raw dataset
    Prepare {
        /// Raw CSV file (defaults to CHURN_DATA_PATH or the bundled location)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Shuffle seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Train the churn model and save it
    Train {
        /// Raw CSV file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Directory for the trained model (defaults to MODELS_DIR or ./models)
        #[arg(short, long)]
        models_dir: Option<PathBuf>,

        /// Maximum solver iterations
        #[arg(long, default_value = "1000")]
        max_iter: usize,

        /// Inverse regularization strength
        #[arg(short, long, default_value = "1.0")]
        c: f64,

        /// Class weighting (balanced, uniform)
        #[arg(long, default_value = "balanced")]
        class_weight: String,

        /// Scaler for numeric columns (standard, minmax, none)
        #[arg(long, default_value = "standard")]
        scaler: String,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Shuffle seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Start the prediction API
    Serve {
        /// Server port (defaults to API_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host (defaults to API_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Trained model file
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Send one customer from a JSON file to the API
    Predict {
        /// Customer JSON file; prompted for when omitted
        customer: Option<PathBuf>,

        /// Prediction endpoint (defaults to CHURN_API_URL or the local server)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show dataset information
    Info {
        /// Raw CSV file
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn data_config(data: Option<PathBuf>) -> DataConfig {
    match data {
        Some(path) => DataConfig::default().with_csv_path(path),
        None => DataConfig::default(),
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_prepare(data: Option<PathBuf>, test_size: f64, seed: u64) -> anyhow::Result<()> {
    section("Prepare");

    let config = data_config(data)
        .with_test_size(test_size)
        .with_random_state(seed);

    step_run(&format!("Loading {}", config.csv_path.display()));
    let start = Instant::now();
    let split = get_train_test_data(&config)?;
    step_done(&format!("{:?}", start.elapsed()));

    let (train_rows, train_cols) = split.train_shape();
    let (test_rows, test_cols) = split.test_shape();

    println!();
    println!("  {:<16} {} × {}", muted("X_train"), train_rows, train_cols);
    println!("  {:<16} {} × {}", muted("X_test"), test_rows, test_cols);

    let train = DataSummary::new(&split.x_train, &split.y_train);
    let test = DataSummary::new(&split.x_test, &split.y_test);
    println!("  {:<16} {:.1}%", muted("Churn (train)"), train.churn_rate() * 100.0);
    println!("  {:<16} {:.1}%", muted("Churn (test)"), test.churn_rate() * 100.0);

    println!();
    println!("  {:<20} {}", muted("Column"), muted("Type"));
    println!("  {}", dim(&"─".repeat(36)));
    for (name, dtype) in &train.dtypes {
        println!("  {:<20} {}", name, dtype.truecolor(140, 140, 140));
    }

    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_train(
    data: Option<PathBuf>,
    models_dir: Option<PathBuf>,
    max_iter: usize,
    c: f64,
    class_weight: &str,
    scaler: &str,
    test_size: f64,
    seed: u64,
) -> anyhow::Result<()> {
    section("Train");

    let data_config = data_config(data)
        .with_test_size(test_size)
        .with_random_state(seed);

    let preprocessing = PreprocessingConfig::default().with_scaler(scaler.parse::<ScalerType>()?);

    let mut training = TrainingConfig::default()
        .with_max_iter(max_iter)
        .with_c(c)
        .with_class_weight(class_weight.parse::<ClassWeight>()?);
    if let Some(dir) = models_dir {
        training = training.with_models_dir(dir);
    }

    let trainer = Trainer::new(data_config, preprocessing, training);

    step_run("Preparing data");
    let start = Instant::now();
    let split = get_train_test_data(&trainer.data)?;
    let (train_rows, train_cols) = split.train_shape();
    step_done(&format!(
        "{} train / {} test rows, {} columns in {:?}",
        train_rows,
        split.x_test.height(),
        train_cols,
        start.elapsed()
    ));

    step_run(&format!("Training {}", "logistic regression".cyan()));
    let start = Instant::now();
    let outcome = trainer.train_on_split(&split)?;
    step_done(&format!("{:?}", start.elapsed()));
    step_ok(&format!("Model saved to {}", outcome.model_path.display()));

    section("Classification report (test)");
    for line in outcome.report().to_string().lines() {
        println!("  {}", line);
    }
    println!();
    println!("  {:<16} {}", muted("ROC AUC"), format!("{:.4}", outcome.auc()).white().bold());
    println!(
        "  {:<16} {}",
        muted("Iterations"),
        outcome.pipeline.classifier().n_iter.to_string().white()
    );

    section("Strongest coefficients");
    for (name, weight) in outcome.pipeline.top_coefficients(10) {
        let value = format!("{:+.4}", weight);
        let value = if weight > 0.0 { value.red() } else { value.green() };
        println!("  {:<44} {}", name, value);
    }

    println!();
    Ok(())
}

pub fn cmd_info(data: Option<PathBuf>) -> anyhow::Result<()> {
    section("Data Info");

    let config = data_config(data);
    let df = load_raw_data(&config.csv_path)?;

    println!("  {:<12} {}", muted("File"), config.csv_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!("  {:<12} {:.2} MB", muted("Memory"), df.estimated_size() as f64 / 1024.0 / 1024.0);
    println!();

    println!("  {:<20} {:<12} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(50)));

    for col in df.get_columns() {
        println!(
            "  {:<20} {:<12} {:>6} {:>8}",
            col.name(),
            format!("{}", col.dtype()).truecolor(140, 140, 140),
            col.null_count(),
            col.n_unique().unwrap_or(0)
        );
    }

    // Class balance after cleaning, when the label column is usable
    let balance = clean_data(&df, &config)
        .and_then(|cleaned| split_features_target(&cleaned, &config.target_column));
    match balance {
        Ok((x, y)) => {
            let summary = DataSummary::new(&x, &y);
            println!();
            println!("  {:<12} {}", muted("Clean rows"), summary.rows);
            println!(
                "  {:<12} {} churned / {} retained ({:.1}%)",
                muted("Target"),
                summary.positives,
                summary.negatives,
                summary.churn_rate() * 100.0
            );
        }
        Err(e) => {
            println!();
            println!("  {} {}", "target unavailable:".yellow(), e);
        }
    }

    println!();
    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(host: Option<String>, port: Option<u16>, model: Option<PathBuf>) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(model) = model {
        config = config.with_model_path(model);
    }

    let base = format!("http://{}:{}", config.host, config.port);

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Churn Prediction API".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Predict", &format!("POST {}/predict_churn", base)));
    line_box(&kv("Health ", &format!("{}/health", base)));
    line_box(&kv("Model  ", &config.model_path.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

// ─── Predict (client) ──────────────────────────────────────────────────────────

fn prompt_customer_path() -> anyhow::Result<PathBuf> {
    use dialoguer::{theme::ColorfulTheme, Input};

    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Path of the customer JSON file")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

pub async fn cmd_predict(customer: Option<PathBuf>, url: Option<String>) -> anyhow::Result<()> {
    let path = match customer {
        Some(path) => path,
        None => prompt_customer_path()?,
    };
    let url = url.unwrap_or_else(api_url_from_env);

    predict_file(&path, &url).await
}

async fn predict_file(path: &Path, url: &str) -> anyhow::Result<()> {
    let customer = load_customer_from_json(path)?;
    let client = ChurnClient::new(url)?;
    let result = client.predict(&customer).await?;

    println!();
    print_result(&customer, &result)?;
    println!();
    Ok(())
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "churn".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("customer churn prediction  ·  v{}", env!("CARGO_PKG_VERSION"))));
    println!();
}

fn show_help() {
    section("Commands");

    let cmds: &[(&str, &str)] = &[
        ("churn", "Interactive launcher (default)"),
        ("churn prepare", "Load, clean and split the dataset"),
        ("churn train", "Train and save the model"),
        ("churn serve -p 8000", "Start the prediction API"),
        ("churn predict customer.json", "Score one customer via the API"),
        ("churn info", "Inspect the raw dataset"),
    ];

    for (cmd, desc) in cmds {
        println!("  {:<36} {}", cmd.white(), muted(desc));
    }

    section("Endpoints");

    let endpoints: &[(&str, &str)] = &[
        ("POST /predict_churn", "Score one customer"),
        ("GET  /health", "Health check"),
        ("GET  /model", "Model metadata"),
    ];

    for (url, desc) in endpoints {
        println!("  {:<36} {}", url.truecolor(120, 170, 255), muted(desc));
    }

    println!();
}

pub async fn cmd_interactive() -> anyhow::Result<()> {
    use dialoguer::{theme::ColorfulTheme, Select};

    print_banner();

    let theme = ColorfulTheme::default();

    loop {
        let items = &[
            "Train                 prepare data, fit and save the model",
            "Start Server          prediction api",
            "Predict               score a customer json file",
            "Help                  commands & endpoints",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to do")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                if let Err(e) = cmd_train(None, None, 1000, 1.0, "balanced", "standard", 0.2, 42) {
                    println!("  {} {}", "error:".red(), e);
                }
            }
            Some(1) => {
                cmd_serve(None, None, None).await?;
                break;
            }
            Some(2) => {
                if let Err(e) = cmd_predict(None, None).await {
                    println!("  {} {}", "error:".red(), e);
                }
            }
            Some(3) => show_help(),
            Some(_) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
        }
    }

    Ok(())
}
