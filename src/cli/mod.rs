//! ID3 Tree CLI Module
//!
//! Command-line interface for building trees, ranking features and
//! classifying rows with a saved tree.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{self, Dataset};
use crate::explainability::{GainOrder, GainReport};
use crate::training::{rank_features, DecisionNode, Id3Classifier, Id3Config, LabelDistribution};
use crate::utils::{dataset_to_dataframe, DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width
const BAR_WIDTH: usize = 32;

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box_center(""); }

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

fn print_banner() {
    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "ID3 Decision Tree".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_bottom();
}

/// Horizontal bar scaled against the largest gain
fn gain_bar(gain: f64, max_gain: f64) -> String {
    if max_gain <= 0.0 || gain <= 0.0 {
        return String::new();
    }
    let filled = ((gain / max_gain) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "id3")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ID3 decision tree induction with information-gain feature ranking")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the data comes from and which columns to use
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Input data file (CSV, TSV, JSON, or Parquet); the built-in weather table when omitted
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Target column name (default: last column)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Comma-separated feature columns (default: every column except the target)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// JSON configuration file; explicit flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a decision tree
    Tree {
        #[command(flatten)]
        input: DataArgs,

        /// Fail if the tree would need more split levels than this
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print the tree as nested JSON instead of a drawing
        #[arg(long)]
        json: bool,

        /// Also print one rule per root-to-leaf path
        #[arg(long)]
        rules: bool,

        /// Save the tree as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank features by information gain
    Gains {
        #[command(flatten)]
        input: DataArgs,

        /// Sort order (asc, desc, declared)
        #[arg(long)]
        order: Option<String>,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the tree and rank features in one go
    Analyze {
        #[command(flatten)]
        input: DataArgs,
    },

    /// Classify rows with a saved tree
    Predict {
        /// Tree file written by `id3 tree --output`
        #[arg(long)]
        tree: PathBuf,

        /// Rows to classify
        #[arg(short, long)]
        data: PathBuf,

        /// Output file (CSV, or JSON when it ends in .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Data loading ──────────────────────────────────────────────────────────────

/// Resolve the dataset and configuration described by `input`
pub fn load_input(input: &DataArgs) -> anyhow::Result<(Dataset, Id3Config)> {
    let mut config = match &input.config {
        Some(path) => Id3Config::from_json_file(path)?,
        None => Id3Config::default(),
    };
    if let Some(target) = &input.target {
        config.target_column = Some(target.clone());
    }
    if let Some(features) = &input.features {
        config.feature_columns = Some(features.clone());
    }

    let dataset = match &input.data {
        Some(path) => DataLoader::new()
            .load_dataset(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => data::tennis()?,
    };

    Ok((dataset, config))
}

fn describe_source(input: &DataArgs) -> String {
    match &input.data {
        Some(path) => path.display().to_string(),
        None => "built-in weather data".to_string(),
    }
}

fn fit(dataset: &Dataset, config: &Id3Config) -> anyhow::Result<Id3Classifier> {
    let mut classifier = Id3Classifier::new();
    classifier.fit_with_config(dataset, config)?;
    Ok(classifier)
}

/// Rank the configured features without building a tree
fn rank_input(dataset: &Dataset, config: &Id3Config) -> crate::Result<GainReport> {
    let (target, features) = config.resolve(dataset)?;
    let gains = rank_features(dataset, &features, &target)?;
    Ok(GainReport::new(target, gains))
}

fn print_tree(tree: &DecisionNode) {
    for line in tree.render().lines() {
        println!("  {}", line);
    }
}

fn print_gains(report: &GainReport) {
    let max_gain = report.max_gain();
    let width = report
        .gains
        .iter()
        .map(|g| g.feature.chars().count())
        .max()
        .unwrap_or(0)
        .max(7);

    println!("  {:<width$}  {:>8}", muted("Feature"), muted("Gain"), width = width);
    println!("  {}", dim(&"─".repeat(width + 12 + BAR_WIDTH)));
    for g in &report.gains {
        println!(
            "  {:<width$}  {:>8}  {}",
            g.feature,
            format!("{:.4}", g.gain).white(),
            accent(&gain_bar(g.gain, max_gain)),
            width = width
        );
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_tree(
    input: &DataArgs,
    max_depth: Option<usize>,
    json: bool,
    rules: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let (dataset, mut config) = load_input(input)?;
    if max_depth.is_some() {
        config.max_depth = max_depth;
    }

    let start = Instant::now();
    let classifier = fit(&dataset, &config)?;
    let elapsed = start.elapsed();
    let tree = classifier.tree().context("tree was not built")?;

    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(tree)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(tree)?);
        return Ok(());
    }

    section("Decision Tree");
    println!("  {:<12} {}", muted("Source"), describe_source(input));
    println!("  {:<12} {}", muted("Target"), classifier.target().white().bold());
    println!("  {:<12} {}", muted("Features"), classifier.features().join(", "));
    println!(
        "  {:<12} {} splits, {} leaves, depth {} in {:?}",
        muted("Shape"),
        classifier.n_splits(),
        classifier.n_leaves(),
        classifier.depth(),
        elapsed
    );
    println!();
    print_tree(tree);

    if rules {
        section("Rules");
        for rule in tree.rules() {
            println!("  {}", rule);
        }
    }

    if let Some(path) = output {
        println!();
        step_ok(&format!("Tree saved to {}", path.display()));
    }
    println!();
    Ok(())
}

pub fn cmd_gains(input: &DataArgs, order: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (dataset, config) = load_input(input)?;
    let order = match order {
        Some(o) => o.parse::<GainOrder>()?,
        None => config.gain_order,
    };

    let report = rank_input(&dataset, &config)?.sorted(order);

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    section("Feature Importance (Information Gain)");
    println!("  {:<12} {}", muted("Source"), describe_source(input));
    println!("  {:<12} {}", muted("Target"), report.target.white().bold());
    println!();
    print_gains(&report);
    println!();
    Ok(())
}

pub fn cmd_analyze(input: &DataArgs) -> anyhow::Result<()> {
    print_banner();

    step_run("Loading data");
    let start = Instant::now();
    let (dataset, config) = load_input(input)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        dataset.len(),
        dataset.columns().len(),
        start.elapsed()
    ));

    step_run("Building tree");
    let start = Instant::now();
    let classifier = fit(&dataset, &config)?;
    step_done(&format!("{:?}", start.elapsed()));

    let report = classifier.gain_report()?.sorted(config.gain_order);
    let tree = classifier.tree().context("tree was not built")?;

    section("Feature Importance (Information Gain)");
    print_gains(&report);

    section("Decision Logic (JSON)");
    for line in serde_json::to_string_pretty(tree)?.lines() {
        println!("  {}", line);
    }

    section("Decision Tree");
    print_tree(tree);
    println!();
    Ok(())
}

pub fn cmd_predict(tree_path: &Path, data_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(tree_path)
        .with_context(|| format!("failed to read {}", tree_path.display()))?;
    let tree: DecisionNode = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a tree file", tree_path.display()))?;

    let dataset = DataLoader::new()
        .load_dataset(data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    let predictions = dataset
        .rows()
        .enumerate()
        .map(|(i, row)| {
            tree.predict(&row)
                .map(str::to_string)
                .with_context(|| format!("row {}", i))
        })
        .collect::<anyhow::Result<Vec<String>>>()?;

    if let Some(path) = output {
        let mut df = dataset_to_dataframe(&dataset)?;
        df.with_column(Column::new("prediction".into(), &predictions))?;
        let saved = DataSaver::save_auto(&mut df, path)?;
        step_ok(&format!("{} predictions saved to {}", predictions.len(), saved.display()));
        return Ok(());
    }

    section("Predictions");
    for (i, label) in predictions.iter().enumerate() {
        println!("  {:>5}  {}", dim(&i.to_string()), label);
    }
    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let dataset = DataLoader::new().load_dataset(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), dataset.len());
    println!("  {:<12} {}", muted("Columns"), dataset.columns().len());
    println!();

    println!("  {:<20} {:>8}  {}", muted("Column"), muted("Unique"), muted("Most common"));
    println!("  {}", dim(&"─".repeat(50)));

    for (pos, name) in dataset.columns().iter().enumerate() {
        let dist = LabelDistribution::from_labels(dataset.values_at(pos));
        let top = dist
            .majority()
            .map(|v| format!("{} ({})", v, dist.count(v)))
            .unwrap_or_default();
        println!("  {:<20} {:>8}  {}", name, dist.n_distinct(), top.truecolor(140, 140, 140));
    }

    println!();
    Ok(())
}
