use std::process::ExitCode;

mod cli;
mod commands;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    init_logging(cli.output.verbose, cli.output.quiet);

    let ctx = display::Context::detect().with_quiet(cli.output.quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
