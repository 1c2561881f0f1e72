use clap::Parser;
use console::style;
use gitignore_add::ignorelist::Outcome;
use gitignore_add::repo::{Nearest, SelectionPolicy};
use gitignore_add::{Config, Error, Options, Prompt, SelectionMode, run};
use log::warn;
use std::error::Error as _;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::{env, io};

#[derive(Debug, Parser)]
#[clap(name = "gitignore")]
#[clap(about = "Add a path to the .gitignore of the repository containing it", long_about = None)]
struct Cli {
    /// File or directory to ignore
    #[clap(value_parser)]
    path: PathBuf,
    /// Look for every enclosing repository and ask which one to use
    #[clap(short, long)]
    all: bool,
    /// Directory name that marks a repository root
    #[clap(long, value_name = "NAME")]
    marker: Option<String>,
    /// Name of the ignore file inside the repository root
    #[clap(long, value_name = "NAME")]
    ignore_file: Option<String>,
    /// Maximum number of parent directories to search
    #[clap(long, value_name = "N")]
    max_depth: Option<usize>,
}

impl Cli {
    fn options(&self, config: &Config) -> Options {
        let mut options = Options::from(config);
        if self.all {
            options.locator.mode = SelectionMode::All;
        }
        if let Some(marker) = &self.marker {
            options.locator.marker.clone_from(marker);
        }
        if let Some(name) = &self.ignore_file {
            options.ignore_file.clone_from(name);
        }
        if let Some(depth) = self.max_depth {
            options.locator.max_depth = depth;
        }
        options
    }
}

fn execute(args: &Cli) -> Result<(), Error> {
    let config = Config::new()?;
    let options = args.options(&config);

    let mut policy: Box<dyn SelectionPolicy> =
        if options.locator.mode == SelectionMode::All && io::stdin().is_terminal() {
            Box::new(Prompt::stdio())
        } else {
            if options.locator.mode == SelectionMode::All {
                warn!("stdin is not a terminal, using the nearest repository");
            }
            Box::new(Nearest)
        };

    let cwd = env::current_dir()?;
    let report = run(&cwd, &args.path, &options, policy.as_mut())?;
    match report.outcome {
        Outcome::Added => println!(
            "{} {} to {}",
            style("Added").green().bold(),
            report.entry,
            report.ignore_file.display()
        ),
        Outcome::AlreadyPresent => println!(
            "{} {} is already in {}",
            style("Exists").yellow().bold(),
            report.entry,
            report.ignore_file.display()
        ),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
