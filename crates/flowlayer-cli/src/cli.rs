//! Command-line interface for the flowlayer utility
//!
//! Reads a JSON graph document, lays it out and prints positions, levels,
//! a topology signature or a text preview.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use flowlayer::core::logging::init_logging;
use flowlayer::render::{LayoutView, PreviewRenderer, Renderer, DEFAULT_SCALE};
use flowlayer::{CharacterSet, GraphInput, LayoutConfig, LayoutEngine, TopologySignature};

/// Flowlayer - layered force-directed layout for process-flow graphs
#[derive(Parser)]
#[command(name = "flowlayer")]
#[command(about = "Lay out node/edge graphs into levelled 2D positions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
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
    /// Run the layout to convergence and print node positions as JSON
    Layout {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layout configuration JSON; missing keys keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Node to place at level 0
        #[arg(long)]
        root: Option<String>,

        /// Upper bound on simulation ticks
        #[arg(long)]
        max_ticks: Option<usize>,

        /// Print one JSON line per tick instead of the final positions
        #[arg(long)]
        stream: bool,

        /// When to pretty-print the final JSON
        #[arg(long, value_enum, default_value_t = PrettyChoice::Auto)]
        pretty: PrettyChoice,
    },

    /// Print the level of every node and the edges cut to break cycles
    Levels {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Node to place at level 0
        #[arg(long)]
        root: Option<String>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Lay out the graph and draw it as text
    Preview {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Character set to use for rendering output
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// Character cells per layout unit
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: f64,
    },

    /// Print the topology signature digest (comparable within one build)
    Signature {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// When to pretty-print JSON output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum PrettyChoice {
    /// Pretty-print when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Settings for one `layout` run
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub root: Option<String>,
    pub max_ticks: Option<usize>,
    pub stream: bool,
    pub pretty: bool,
}

/// Main CLI application
pub struct FlowlayerApp {
    config: LayoutConfig,
}

impl FlowlayerApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create a new application instance with a layout config
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("FLOWLAYER_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("FLOWLAYER_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Flowlayer v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Layout {
                input,
                output,
                config,
                root,
                max_ticks,
                stream,
                pretty,
            } => {
                if let Some(path) = config {
                    self.config = self.read_config(&path)?;
                }
                let options = LayoutOptions {
                    root,
                    max_ticks,
                    stream,
                    pretty: Self::should_pretty_print(&output, pretty),
                };
                let content = self.read_input(input)?;
                if cli.verbose {
                    eprintln!("Read {} bytes of input", content.len());
                }
                let rendered = self.layout_output(&content, &options)?;
                self.write_output(output, &rendered)
            }
            Commands::Levels { input, root, json } => {
                let content = self.read_input(input)?;
                let rendered = self.levels_output(&content, root.as_deref(), json)?;
                self.write_output(None, &rendered)
            }
            Commands::Preview {
                input,
                output,
                style,
                scale,
            } => {
                let content = self.read_input(input)?;
                let rendered = self.preview_output(&content, style.into(), scale)?;
                self.write_output(output, &rendered)
            }
            Commands::Signature { input } => {
                let content = self.read_input(input)?;
                let graph = GraphInput::from_json(&content)?;
                let signature = TopologySignature::of_input(&graph);
                if cli.verbose {
                    eprintln!("{}", signature);
                }
                self.write_output(None, &Self::signature_output(&signature))
            }
        }
    }

    /// Engine with the input loaded and, if given, `root` placed at level 0
    fn prepare(&self, content: &str, root: Option<&str>) -> Result<LayoutEngine> {
        let graph = GraphInput::from_json(content)?;
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Loaded graph document"
        );
        let mut engine = LayoutEngine::new(self.config.clone());
        engine.set_graph(graph);
        if root.is_some() {
            engine.set_layout_root(root)?;
            engine.relayout();
        }
        Ok(engine)
    }

    fn tick_budget(&self, max_ticks: Option<usize>) -> usize {
        max_ticks.unwrap_or_else(|| self.config.expected_ticks() + 1)
    }

    /// Final snapshot, or one line per tick when streaming
    pub fn layout_output(&self, content: &str, options: &LayoutOptions) -> Result<String> {
        let mut engine = self.prepare(content, options.root.as_deref())?;
        let budget = self.tick_budget(options.max_ticks);

        if options.stream {
            let mut lines = String::new();
            for snapshot in engine.ticks(budget) {
                lines.push_str(&serde_json::to_string(&snapshot)?);
                lines.push('\n');
            }
            return Ok(lines);
        }

        let snapshot = engine.run(budget);
        let json = if options.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }

    /// Level listing in column order, then cut edges
    pub fn levels_output(&self, content: &str, root: Option<&str>, json: bool) -> Result<String> {
        let engine = self.prepare(content, root)?;
        let layering = engine.levels();

        if json {
            let value = serde_json::json!({
                "root": layering.root(),
                "levels": layering.by_id(),
                "cutEdges": engine.cut_edges(),
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let nodes = engine.graph().nodes();
        let mut lines = Vec::new();
        for (level, column) in layering.columns().iter().enumerate() {
            let ids: Vec<&str> = column.iter().map(|&i| nodes[i].id.as_str()).collect();
            lines.push(format!("{}: {}", level, ids.join(", ")));
        }
        for (source, target) in engine.cut_edges() {
            lines.push(format!("cut: {} -> {}", source, target));
        }
        Ok(lines.join("\n"))
    }

    /// Text preview of the converged layout
    pub fn preview_output(&self, content: &str, style: CharacterSet, scale: f64) -> Result<String> {
        let mut engine = self.prepare(content, None)?;
        engine.run(self.tick_budget(None));
        PreviewRenderer::with_style(style)
            .with_scale(scale)
            .render(&LayoutView::of_engine(&engine))
    }

    pub fn signature_output(signature: &TopologySignature) -> String {
        format!("{:016x}", signature.digest())
    }

    /// Determine if the final JSON should be pretty-printed
    fn should_pretty_print(output: &Option<PathBuf>, pretty: PrettyChoice) -> bool {
        match pretty {
            PrettyChoice::Always => true,
            PrettyChoice::Never => false,
            PrettyChoice::Auto => match output {
                None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                Some(ref p) if p.to_str() == Some("-") => {
                    crossterm::tty::IsTty::is_tty(&std::io::stdout())
                }
                Some(_) => false,
            },
        }
    }

    fn read_config(&self, path: &Path) -> Result<LayoutConfig> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        LayoutConfig::from_json(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
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
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                debug!(path = %path.display(), bytes = content.len(), "Writing output file");
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for FlowlayerApp {
    fn default() -> Self {
        Self::new()
    }
}
