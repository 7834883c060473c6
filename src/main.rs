use clap::{App, AppSettings, Arg, SubCommand};
use log::{error, info, LevelFilter};
use scriptorium::build::{build_site, clean};
use scriptorium::config::Config;
use scriptorium::init::initialize;
use simple_logger::SimpleLogger;
use std::path::Path;

fn main() {
    let directory = Arg::with_name("DIRECTORY")
        .help("The project directory")
        .required(true)
        .index(1);

    let matches = App::new("scriptorium")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Logs debug output"),
        )
        .subcommand(
            SubCommand::with_name("init")
                .about("Creates a new project with sample content")
                .arg(directory.clone()),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the blog of the project")
                .arg(directory.clone()),
        )
        .subcommand(
            SubCommand::with_name("clean")
                .about("Deletes the generated files of the project")
                .arg(directory),
        )
        .get_matches();

    let (command, sub_matches) = matches.subcommand();

    // `-v` may come before or after the subcommand
    let verbose = matches.is_present("verbose")
        || sub_matches.map_or(false, |m| m.is_present("verbose"));
    let level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Initializing logger: {}", err);
    }

    let directory = sub_matches
        .and_then(|m| m.value_of("DIRECTORY"))
        .map(Path::new)
        .unwrap_or_else(|| Path::new("."));

    if let Err(err) = run(command, directory) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(command: &str, directory: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        "init" => initialize(directory)?,
        "build" => {
            let config = Config::from_directory(&directory.canonicalize()?)?;
            let summary = build_site(&config)?;
            info!(
                "Built {} posts, {} pages, {} index pages and {} category pages",
                summary.posts, summary.pages, summary.index_pages, summary.category_pages
            );
        }
        "clean" => {
            let config = Config::from_directory(&directory.canonicalize()?)?;
            let removed = clean(&config.output_directory, &config.clean_ignore)?;
            info!("Removed {} files", removed);
        }
        _ => unreachable!("clap only accepts the declared subcommands"),
    }
    Ok(())
}
