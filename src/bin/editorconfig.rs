use clap::Parser as _;
use editorconfig_core::{resolve_with_options, Options, Version, MAX_VERSION};
use std::path::Path;
use std::process::ExitCode;

#[derive(clap::Parser)]
struct Cli {
    #[arg(short, long)]
    version: bool,

    /// An EditorConfig file name to look for, instead of `.editorconfig`.
    #[arg(short = 'f')]
    conf_filename: Option<String>,

    /// EditorConfig version to report/emulate, for compatibility testing.
    #[arg(short = 'b')]
    ec_version: Option<Version>,

    files: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let mut options = Options::default();
    if let Some(conf_filename) = args.conf_filename.as_deref() {
        options.conf_filename = conf_filename;
    }
    if let Some(version) = args.ec_version {
        options.version = version;
    }

    let mut had_error = false;
    for file in &args.files {
        if args.files.len() > 1 {
            println!("[{file}]");
        }
        if let Err(err) = print_pairs(file, &options) {
            log::error!("{file}: {err}");
            had_error = true;
        }
    }

    if had_error { ExitCode::from(2) } else { ExitCode::SUCCESS }
}

fn print_pairs(file: &str, options: &Options) -> Result<(), editorconfig_core::Error> {
    let props = resolve_with_options(Path::new(file), options)?;

    let mut props: Vec<_> = props.iter().collect();
    // The compatibility test suite expects keys sorted.
    props.sort_unstable_by_key(|&(key, _value)| key);

    for (key, value) in props {
        println!("{key}={value}");
    }

    Ok(())
}

fn print_version() {
    println!("EditorConfig Rust Core Version {MAX_VERSION}");
}
