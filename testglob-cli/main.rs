use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize as _;
use testglob_config::{
    ConfigFormat, PatternSet, TestConfig, default_python_classes, default_python_functions,
};
use testglob_pattern::{Dashes, compile, compile_alternation};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Config files pytest looks for, in order of precedence within a directory.
const CONFIG_FILE_NAMES: &[&str] = &["pytest.ini", "pyproject.toml", "tox.ini"];

#[derive(Debug, clap::Parser)]
#[command(version, about = "Inspect pytest test discovery patterns")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Show the effective class and function name patterns and the regexes
    /// they compile to.
    Show(ConfigArgs),
    /// Check whether names would be collected as test classes or test
    /// functions. Exits with status 1 if any name does not match.
    Check {
        #[command(flatten)]
        config: ConfigArgs,
        /// Class name to check. May be given multiple times.
        #[arg(long = "class", value_name = "NAME")]
        classes: Vec<String>,
        /// Function name to check. May be given multiple times.
        #[arg(long = "function", value_name = "NAME")]
        functions: Vec<String>,
    },
    /// Compile wildcard patterns and print the resulting regex fragments.
    Compile {
        /// Treat `-` outside of character classes as a CamelCase boundary,
        /// as is done for class name patterns.
        #[arg(long, short = 'w')]
        word_boundary: bool,
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// The path to the config file (`pytest.ini`, `tox.ini` or
    /// `pyproject.toml`). Defaults to searching the working dir and its
    /// parents.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// The matchers in effect, and where they came from.
struct Effective {
    file: Option<PathBuf>,
    config: Option<TestConfig>,
    python_classes: PatternSet,
    python_functions: PatternSet,
}

impl Effective {
    fn load(args: &ConfigArgs) -> Result<Self> {
        let file = match args.file {
            Some(ref file) => Some(file.clone()),
            None => find_config_file(&std::env::current_dir()?),
        };

        let config = match file {
            Some(ref file) => read_config(file)?,
            None => {
                tracing::debug!("no config file found; using defaults");
                None
            }
        };

        let (python_classes, python_functions) = match config {
            Some(ref config) => (
                config.python_classes().clone(),
                config.python_functions().clone(),
            ),
            None => (default_python_classes(), default_python_functions()),
        };

        Ok(Self {
            file,
            config,
            python_classes,
            python_functions,
        })
    }
}

fn read_config(path: &Path) -> Result<Option<TestConfig>> {
    let Some(format) = ConfigFormat::from_path(path) else {
        anstream::eprintln!(
            "{}: {} is not an INI or TOML file; using defaults",
            "warning".yellow().bold(),
            path.display()
        );
        return Ok(None);
    };

    let source = std::fs::read_to_string(path)?;
    match TestConfig::parse(format, &source) {
        Ok(config) => Ok(Some(config)),
        Err(err) => {
            anstream::eprintln!("{}", err.with_location(path, &source));
            anstream::eprintln!("{}: using defaults", "warning".yellow().bold());
            Ok(None)
        }
    }
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("TESTGLOB_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Show(args) => show(&args),
        Command::Check {
            config,
            classes,
            functions,
        } => check(&config, &classes, &functions),
        Command::Compile {
            word_boundary,
            patterns,
        } => {
            let dashes = if word_boundary {
                Dashes::WordBoundary
            } else {
                Dashes::Literal
            };
            compile_patterns(&patterns, dashes)
        }
    }
}

fn show(args: &ConfigArgs) -> Result<ExitCode> {
    let effective = Effective::load(args)?;

    match (&effective.file, &effective.config) {
        (Some(file), Some(config)) => {
            println!("config: {} ({})", file.display(), config.format());
        }
        (Some(file), None) => println!("config: {} (not used)", file.display()),
        (None, _) => println!("config: none"),
    }

    let (classes_raw, functions_raw) = effective
        .config
        .as_ref()
        .map(|config| (config.python_classes_raw(), config.python_functions_raw()))
        .unwrap_or_default();

    print_option("python_classes", classes_raw.is_none(), &effective.python_classes);
    print_option(
        "python_functions",
        functions_raw.is_none(),
        &effective.python_functions,
    );

    Ok(ExitCode::SUCCESS)
}

fn print_option(name: &str, is_default: bool, set: &PatternSet) {
    if is_default {
        println!("{name} = {set} {}", "(default)".dimmed());
    } else {
        println!("{name} = {set}");
    }
    println!("    {}", set.as_str());
}

fn check(args: &ConfigArgs, classes: &[String], functions: &[String]) -> Result<ExitCode> {
    if classes.is_empty() && functions.is_empty() {
        anyhow::bail!("nothing to check; pass `--class NAME` or `--function NAME`");
    }

    let effective = Effective::load(args)?;
    let mut all_match = true;

    let names = classes
        .iter()
        .map(|name| ("class", name, &effective.python_classes))
        .chain(
            functions
                .iter()
                .map(|name| ("function", name, &effective.python_functions)),
        );

    for (kind, name, set) in names {
        if set.is_match(name) {
            anstream::println!("{kind} {name}: {}", "match".green());
        } else {
            all_match = false;
            anstream::println!("{kind} {name}: {} ({set})", "no match".red());
        }
    }

    Ok(if all_match {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn compile_patterns(patterns: &[String], dashes: Dashes) -> Result<ExitCode> {
    for pattern in patterns.iter().flat_map(|p| p.split_whitespace()) {
        println!("{pattern}  =>  {}", compile(pattern, dashes));
    }

    let joined = patterns.join(" ");
    println!("regex: ^(?:{})$", compile_alternation(&joined, dashes));

    // Report what the regex engine rejects.
    PatternSet::new(&joined, dashes)?;
    Ok(ExitCode::SUCCESS)
}
