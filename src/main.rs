//! KVue CLI - compile a template against instance data and print the result

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use kvue::{
    Compiler, CompilerConfig, Document, FixSuggestion, Instance, KvueError, MissingMethodPolicy,
    Result, Step,
};

#[derive(Parser)]
#[command(name = "kvue")]
#[command(about = "Declarative template compiler binding reactive instance state to a DOM tree")]
#[command(version)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template, replay steps, print the resulting markup
    Render {
        /// Path to the template markup
        template: PathBuf,

        /// Instance data (JSON, or YAML for .yaml/.yml)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Selector of the root element
        #[arg(short, long, default_value = "#app")]
        root: String,

        /// Compiler config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip event bindings to unknown methods instead of failing
        #[arg(long)]
        lenient: bool,

        /// Interaction to replay, in order (set:<expr>=<v>, input:<sel>=<text>, event:<sel>=<type>)
        #[arg(short, long = "step")]
        steps: Vec<String>,

        /// Print html, data and report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile against an empty instance and report what would be bound
    Check {
        /// Path to the template markup
        template: PathBuf,

        /// Selector of the root element
        #[arg(short, long, default_value = "#app")]
        root: String,

        /// Compiler config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render {
            template,
            data,
            root,
            config,
            lenient,
            steps,
            json,
        } => render(&template, data.as_deref(), &root, config.as_deref(), lenient, &steps, json),
        Commands::Check {
            template,
            root,
            config,
        } => check(&template, &root, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        process::exit(1);
    }
}

fn load_data(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

fn render(
    template: &Path,
    data: Option<&Path>,
    root: &str,
    config: Option<&Path>,
    lenient: bool,
    steps: &[String],
    as_json: bool,
) -> Result<()> {
    let mut config = CompilerConfig::load(config)?;
    if lenient {
        config = config.with_missing_method(MissingMethodPolicy::Warn);
    }
    // Parse all steps up front so a typo fails before anything runs
    let steps = steps
        .iter()
        .map(|s| s.parse::<Step>())
        .collect::<Result<Vec<_>>>()?;

    let document = Rc::new(Document::from_markup(&fs::read_to_string(template)?));
    let instance = Instance::from_data(load_data(data)?)?;
    let compiler = Compiler::builder(Rc::clone(&document), Rc::clone(&instance))
        .config(config)
        .mount(root)?;

    if compiler.root().is_none() {
        eprintln!(
            "{} no element matches '{}', nothing was compiled",
            "warning:".yellow().bold(),
            root
        );
    }

    for step in &steps {
        step.apply(&compiler)?;
    }

    let html = document.inner_html(document.root());
    if as_json {
        let out = json!({
            "html": html,
            "data": instance.data_snapshot(),
            "report": compiler.report(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", html);
    }
    Ok(())
}

fn check(template: &Path, root: &str, config: Option<&Path>) -> Result<()> {
    let config = CompilerConfig::load(config)?.with_missing_method(MissingMethodPolicy::Warn);
    let document = Rc::new(Document::from_markup(&fs::read_to_string(template)?));
    let instance = Instance::builder().build();
    let compiler = Compiler::builder(document, instance).config(config).mount(root)?;
    let report = compiler.report();

    if !report.root_found {
        return Err(KvueError::NodeNotFound {
            selector: root.to_string(),
        });
    }

    println!("{} Template '{}' compiled", "✓".green(), template.display());
    println!("  Nodes visited: {}", report.nodes_visited);
    println!("  k-text: {}", report.text_bindings);
    println!("  k-html: {}", report.html_bindings);
    println!("  k-model: {}", report.model_bindings);
    println!("  Interpolations: {}", report.interpolations);
    println!("  Subscriptions: {}", report.subscriptions());
    println!(
        "  Event bindings: {} (unresolved against empty instance)",
        report.skipped_events
    );
    if report.ignored_directives > 0 {
        println!(
            "  {} {} unknown directive attribute(s) ignored",
            "!".yellow(),
            report.ignored_directives
        );
    }
    Ok(())
}
