//! Command-line front end for the utter generation core.
//!
//! Usage:
//!   utter render --tree tree.toml --object ok_button
//!   utter context --tree tree.toml --object cell_3_1 --stop table
//!   utter validate --profile gedit.toml
//!   utter parse "labelAndName + (roleName or description)"

use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use utter::parser::{parse_to_ast, parse_to_token_tree, util};
use utter::runner::api::{GenerateOptions, Presenter};
use utter::runner::ds::{
    AccessibleRef, ElementList, FormatMode, MemoryTree, NativeId, ObjectCache, OutputChannel, Role,
};
use utter::runner::plugin::{GeneratorRegistry, Profile};
use utter::runner::script::DefaultScript;

#[derive(Parser)]
#[command(name = "utter")]
#[command(about = "Generate speech and braille presentations of accessible objects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Present one object of a fixture tree
    Render {
        /// TOML fixture describing the accessible tree
        #[arg(long)]
        tree: PathBuf,

        /// Id of the object to present
        #[arg(long)]
        object: String,

        /// focused|unfocused|basicWhereAmI|detailedWhereAmI|ancestor
        #[arg(long, default_value = "unfocused")]
        mode: String,

        /// speech|braille
        #[arg(long, default_value = "speech")]
        channel: String,

        /// Present the object as if it had this role
        #[arg(long)]
        role: Option<String>,

        /// Id of the previously presented object, for context
        #[arg(long)]
        prior: Option<String>,

        /// Application profile to load over the built-in tables
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Print the context breadcrumb of an object
    Context {
        #[arg(long)]
        tree: PathBuf,

        #[arg(long)]
        object: String,

        /// Stop below this ancestor
        #[arg(long)]
        stop: Option<String>,

        #[arg(long, default_value = "speech")]
        channel: String,

        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Load and dry-run the format tables; exits non-zero on problems
    Validate {
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Print the parse of a format expression
    Parse {
        expression: String,

        /// Print pest's token tree instead of the AST
        #[arg(long)]
        tokens: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_profile(path: Option<&PathBuf>) -> Result<Profile> {
    match path {
        Some(path) => Profile::load(path)
            .with_context(|| format!("failed to load profile {}", path.display())),
        None => Ok(Profile::new()),
    }
}

fn presenter(channel: OutputChannel, profile: &Profile) -> Presenter {
    Presenter::from_profile(
        channel,
        profile,
        GeneratorRegistry::with_core(),
        Rc::new(DefaultScript),
    )
}

fn fetch(cache: &ObjectCache, id: &str) -> Result<AccessibleRef> {
    cache
        .get(&NativeId::new(id))
        .with_context(|| format!("no object with id {:?}", id))
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Render {
            tree,
            object,
            mode,
            channel,
            role,
            prior,
            profile,
        } => {
            let mode: FormatMode = mode.parse()?;
            let channel: OutputChannel = channel.parse()?;
            let role = role.map(|r| r.parse::<Role>()).transpose()?;
            let profile = load_profile(profile.as_ref())?;
            let tree = MemoryTree::load(&tree)?;
            let cache = ObjectCache::new(Box::new(tree));

            let obj = fetch(&cache, &object)?;
            let mut options = GenerateOptions::new(mode).with_role(role);
            if let Some(prior) = prior {
                options = options.with_prior_object(&fetch(&cache, &prior)?);
            }
            let presenter = presenter(channel, &profile);
            let elements = presenter.generate_with(&obj, options);
            println!("{}", elements);
            Ok(0)
        }
        Commands::Context {
            tree,
            object,
            stop,
            channel,
            profile,
        } => {
            let channel: OutputChannel = channel.parse()?;
            let profile = load_profile(profile.as_ref())?;
            let cache = ObjectCache::new(Box::new(MemoryTree::load(&tree)?));

            let obj = fetch(&cache, &object)?;
            let stop = stop.map(|id| fetch(&cache, &id)).transpose()?;
            let presenter = presenter(channel, &profile);
            for entry in presenter.generate_context(&obj, stop.as_ref()) {
                println!("{}", ElementList::from(vec![entry]));
            }
            Ok(0)
        }
        Commands::Validate { profile } => {
            let profile = load_profile(profile.as_ref())?;
            let mut clean = true;
            for channel in [OutputChannel::Speech, OutputChannel::Braille] {
                let presenter = presenter(channel, &profile);
                let report = presenter.validation_report();
                if report.is_clean() {
                    println!("{:?}: ok", channel);
                } else {
                    clean = false;
                    println!("{:?}:\n{}", channel, report);
                }
            }
            Ok(if clean { 0 } else { 1 })
        }
        Commands::Parse { expression, tokens } => {
            if tokens {
                match parse_to_token_tree(&expression) {
                    Ok(tree) => println!("{}", tree),
                    Err(e) => anyhow::bail!(e),
                }
            } else {
                let expr = parse_to_ast(&expression)?;
                print!("{}", util::to_tree_string(&expr));
            }
            Ok(0)
        }
    }
}
