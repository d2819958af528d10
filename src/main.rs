//! CLI entry point of `mhtml-to-html`

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{info, warn};

use mhtml_to_html::core::{
    ensure_html_extension, format_output_path, mhtml_to_html, print_error_message, MhtmlError,
    MhtmlOptions, Result,
};
use mhtml_to_html::env::EnvConfig;

#[derive(Parser, Debug)]
#[command(
    name = "mhtml-to-html",
    version,
    about = "Converts MHTML archives into standalone HTML documents",
    after_help = "Examples:\n  mhtml-to-html file.mht\n  mhtml-to-html file1.mht file2.mht\n  mhtml-to-html file.mht --output output_file.html\n  mhtml-to-html *.mht --enable-scripts"
)]
struct Cli {
    /// Input MHTML files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// Output HTML file, only used with a single input
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Keep scripts and event handlers
    #[arg(long)]
    enable_scripts: bool,

    /// Download resources the archive references but lacks
    #[arg(long)]
    fetch_missing_resources: bool,

    /// Accept invalid TLS certificates when fetching
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Network timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// User-Agent header sent when fetching
    #[arg(short, long, value_name = "USER_AGENT")]
    user_agent: Option<String>,

    /// Log debug information
    #[arg(short, long, conflicts_with = "silent")]
    verbose: bool,

    /// Suppress log output
    #[arg(short, long)]
    silent: bool,
}

impl Cli {
    fn options(&self, env: &EnvConfig) -> MhtmlOptions {
        MhtmlOptions {
            enable_scripts: self.enable_scripts || env.enable_scripts,
            fetch_missing_resources: self.fetch_missing_resources || env.fetch_missing,
            insecure: self.insecure,
            timeout: self.timeout.unwrap_or(env.timeout),
            user_agent: self.user_agent.clone().or_else(|| env.user_agent.clone()),
        }
    }

    /// Output path for `input`
    fn output_path(&self, input: &str) -> PathBuf {
        match (&self.output, self.inputs.len()) {
            (Some(output), 1) => ensure_html_extension(output),
            _ => format_output_path(input),
        }
    }
}

fn init_logging(cli: &Cli, env: &EnvConfig) {
    let level = if cli.silent {
        "off"
    } else if cli.verbose {
        "debug"
    } else {
        env.log_level
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_ansi(!env.no_color && atty::is(atty::Stream::Stderr))
        .init();
}

fn convert_file(input: &str, output: &Path, options: &MhtmlOptions) -> Result<()> {
    if Path::new(input) == output {
        return Err(MhtmlError::InvalidOption(format!(
            "output path {} is the input path",
            output.display()
        )));
    }

    let data = fs::read(input).map_err(|source| MhtmlError::Io {
        path: input.to_string(),
        source,
    })?;
    let page = mhtml_to_html(&data, options)?;

    fs::write(output, page.data).map_err(|source| MhtmlError::Io {
        path: output.display().to_string(),
        source,
    })?;

    info!(input, output = %output.display(), "converted");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let (env, env_errors) = EnvConfig::from_env();

    init_logging(&cli, &env);
    for err in &env_errors {
        warn!(%err, "ignoring environment variable");
    }

    if cli.output.is_some() && cli.inputs.len() > 1 {
        warn!("--output is ignored when several inputs are given");
    }

    let options = cli.options(&env);
    let colored = !env.no_color && atty::is(atty::Stream::Stderr);
    let mut failed = false;

    for input in &cli.inputs {
        let output = cli.output_path(input);

        if let Err(err) = convert_file(input, &output, &options) {
            print_error_message(&format!("Error processing {}: {}", input, err), colored);
            failed = true;
        }
    }

    if failed {
        process::exit(1);
    }
}
