use clap::Parser;
use miette::Result;
use swx::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping to `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    setup_logging(global.verbose, global.quiet);

    match cli.command {
        Commands::Characters(args) => swx::cli::commands::characters::run(args, &global),
        Commands::Resolve(args) => swx::cli::commands::resolve::run(args, &global),
        Commands::Cache(cmd) => swx::cli::commands::cache::run(cmd, &global),
        Commands::Config(cmd) => swx::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => swx::cli::commands::completions::run(args),
    }
}

/// Log to stderr so stdout stays clean for piped output.
///
/// `SWX_LOG` (or `RUST_LOG`) wins over the verbosity flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "swx=debug"
    } else if quiet {
        "swx=error"
    } else {
        "swx=warn"
    };

    let filter = EnvFilter::try_from_env("SWX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
