//! Command-line interface for the trellis utility
//!
//! Lays out template hierarchy documents on concentric rings and converts
//! them to Mermaid class-diagram markup.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use trellis::core::Node;
use trellis::plugins::class::TypeStrategy;
use trellis::plugins::radial::RadialConfig;
use trellis::plugins::Orchestrator;

/// Trellis - Radial layout and class-diagram export for template hierarchies
#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Lay out template hierarchies on rings and export them as class diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); defaults to the environment, then warn
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a graph document to class-diagram markup
    Convert {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the markup (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the radial layout and write it as JSON
    Layout {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the layout document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with layout configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Canvas width
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height
        #[arg(long)]
        height: Option<f64>,

        /// Ring spacing factor
        #[arg(long)]
        radius_step: Option<f64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a graph document for cycles, dangling links and unplaced nodes
    Validate {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the node types known to the class-diagram serializer
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct TypeListing<'a> {
    types: Vec<TypeEntry<'a>>,
    fallback: &'a TypeStrategy,
    total: usize,
}

#[derive(Serialize)]
struct TypeEntry<'a> {
    tag: &'a str,
    #[serde(flatten)]
    strategy: &'a TypeStrategy,
}

/// Main CLI application
pub struct TrellisApp {
    orchestrator: Orchestrator,
}

impl TrellisApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        if cli.verbose {
            eprintln!("Trellis v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert { input, output } => self.convert_command(input, output, cli.verbose),
            Commands::Layout {
                input,
                output,
                config,
                width,
                height,
                radius_step,
                pretty,
            } => {
                let config = Self::build_config(config.as_deref(), width, height, radius_step)?;
                self.orchestrator = Orchestrator::new().with_config(config);
                self.layout_command(input, output, pretty, cli.verbose)
            }
            Commands::Validate { input, json } => self.validate_command(input, json, cli.verbose),
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Layout configuration from an optional file plus flag overrides
    pub fn build_config(
        path: Option<&Path>,
        width: Option<f64>,
        height: Option<f64>,
        radius_step: Option<f64>,
    ) -> Result<RadialConfig> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    anyhow!("Failed to read config file '{}': {}", path.display(), e)
                })?;
                serde_json::from_str(&text)
                    .map_err(|e| anyhow!("Invalid config file '{}': {}", path.display(), e))?
            }
            None => RadialConfig::default(),
        };

        if let Some(width) = width {
            config.width = width;
        }
        if let Some(height) = height {
            config.height = height;
        }
        if let Some(radius_step) = radius_step {
            config.radius_step = radius_step;
        }
        config.validate()?;
        debug!(?config, "Layout configuration");
        Ok(config)
    }

    /// Handle the convert command
    fn convert_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let markup = self.orchestrator.convert(&content)?;

        if verbose {
            eprintln!("Successfully converted graph to class-diagram markup");
        }

        self.write_output(output, &markup)
    }

    /// Handle the layout command
    fn layout_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        pretty: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document = self.orchestrator.layout(&content)?;
        if !document.unplaced.is_empty() {
            warn!(unplaced = ?document.unplaced, "Some nodes were not placed");
        }

        let json = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };

        if verbose {
            eprintln!(
                "Placed {} of {} nodes",
                document.nodes.len() - document.unplaced.len(),
                document.nodes.len()
            );
        }

        self.write_output(output, &json)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let report = match self.orchestrator.validate(&content) {
            Ok(report) => report,
            Err(e) => {
                if !json {
                    println!("✗ Invalid graph: {}", e);
                }
                return Err(e);
            }
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!(
            "✓ Valid graph: {} nodes, {} links, {} roots",
            report.node_count,
            report.link_count,
            report.roots.len()
        );
        if let Some(max_level) = report.max_level {
            println!("  deepest level: {}", max_level);
        }
        for link in &report.dangling_links {
            println!("  dangling link: {}", link);
        }
        if !report.unplaced.is_empty() {
            let ids: Vec<String> = report.unplaced.iter().map(|id| id.to_string()).collect();
            println!("  unplaced nodes: {}", ids.join(", "));
        }
        Ok(())
    }

    /// Handle the types command
    pub fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing class-diagram node types");
        }

        let table = self.orchestrator.table();
        if json {
            let listing = TypeListing {
                types: table
                    .iter()
                    .map(|(tag, strategy)| TypeEntry { tag, strategy })
                    .collect(),
                fallback: table.fallback(),
                total: table.len(),
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Node types:");
            for (tag, strategy) in table.iter() {
                let sample = Node::new(0u64, "", tag);
                println!(
                    "  {:<10} <<{}>> {} (relation: {})",
                    tag,
                    strategy.stereotype,
                    strategy.edge_token(&sample),
                    strategy.relation
                );
            }
            let fallback = table.fallback();
            let sample = Node::new(0u64, "", "");
            println!(
                "  {:<10} <<{}>> {} (relation: {})",
                "(other)",
                fallback.stereotype,
                fallback.edge_token(&sample),
                fallback.relation
            );
            println!();
            println!("Total: {} node types", table.len());
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Get a reference to the orchestrator (for testing)
    #[cfg(test)]
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

impl Default for TrellisApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const EXAMPLE: &str = r#"{
        "nodes": [
            {"id": 1, "name": "Root", "type": "template"},
            {"id": 2, "name": "Leaf A", "type": "field", "section": 1},
            {"id": 3, "name": "Leaf B", "type": "field", "section": 1}
        ],
        "links": [{"source": 1, "target": 2}, {"source": 1, "target": 3}]
    }"#;

    #[test]
    fn test_cli_parsing_convert_command() {
        let args = vec!["trellis", "convert", "--input", "graph.json", "--output", "out.mmd"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Convert { input, output } => {
                assert_eq!(input.unwrap().to_string_lossy(), "graph.json");
                assert_eq!(output.unwrap().to_string_lossy(), "out.mmd");
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_parsing_layout_command() {
        let args = vec![
            "trellis",
            "layout",
            "-i",
            "graph.json",
            "--width",
            "800",
            "--radius-step",
            "120",
            "--pretty",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Layout {
                width,
                height,
                radius_step,
                pretty,
                config,
                ..
            } => {
                assert_eq!(width, Some(800.0));
                assert_eq!(height, None);
                assert_eq!(radius_step, Some(120.0));
                assert!(pretty);
                assert!(config.is_none());
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_command() {
        let cli = Cli::try_parse_from(vec!["trellis", "validate"]).unwrap();

        match cli.command {
            Commands::Validate { input, json } => {
                assert!(input.is_none());
                assert!(!json);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags() {
        let args = vec!["trellis", "types", "--json", "--verbose", "--log-level", "debug"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.log_format.is_none());
        assert!(matches!(cli.command, Commands::Types { json: true }));
    }

    #[test]
    fn test_build_config_overrides() {
        let config = TrellisApp::build_config(None, Some(400.0), None, Some(50.0)).unwrap();
        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.radius_step, 50.0);
    }

    #[test]
    fn test_build_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, r#"{"width": 1000, "radius_step": 10}"#).unwrap();

        let config = TrellisApp::build_config(Some(&path), None, Some(500.0), None).unwrap();
        assert_eq!(config.width, 1000.0);
        assert_eq!(config.height, 500.0);
        assert_eq!(config.radius_step, 10.0);
    }

    #[test]
    fn test_build_config_rejects_invalid() {
        assert!(TrellisApp::build_config(None, None, None, Some(-1.0)).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("graph.json");
        fs::write(&file_path, EXAMPLE).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, EXAMPLE);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let err = app.read_input(Some(dir.path().join("missing.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_convert_command_to_file() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("graph.json");
        let output = dir.path().join("diagram.mmd");
        fs::write(&input, EXAMPLE).unwrap();

        app.convert_command(Some(input), Some(output.clone()), false).unwrap();

        let markup = fs::read_to_string(&output).unwrap();
        assert!(markup.starts_with("classDiagram\n"));
        assert!(markup.contains("    Root_1 -- Leaf_B_3\n"));
    }

    #[test]
    fn test_layout_command_to_file() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("graph.json");
        let output = dir.path().join("layout.json");
        fs::write(&input, EXAMPLE).unwrap();

        app.layout_command(Some(input), Some(output.clone()), true, false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["levels"]["3"], 1);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_validate_command_rejects_cycle() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("cycle.json");
        fs::write(
            &input,
            r#"{"nodes": [{"id": 1}, {"id": 2}],
                "links": [{"source": 1, "target": 2}, {"source": 2, "target": 1}]}"#,
        )
        .unwrap();

        assert!(app.validate_command(Some(input), true, false).is_err());
    }

    #[test]
    fn test_validate_command_accepts_example() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("graph.json");
        fs::write(&input, EXAMPLE).unwrap();

        assert!(app.validate_command(Some(input), false, false).is_ok());
    }

    #[test]
    fn test_write_output_to_file() {
        let app = TrellisApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.txt");

        app.write_output(Some(file_path.clone()), "Test output").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Test output");
    }

    #[test]
    fn test_types_command() {
        let app = TrellisApp::default();
        assert!(app.types_command(true, false).is_ok());
        assert!(app.types_command(false, false).is_ok());
        assert_eq!(app.orchestrator().table().len(), 4);
    }
}
