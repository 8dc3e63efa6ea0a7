use pnpm_guard::commands::Cli;
use pnpm_guard::report::{banner_colorize, write_banner, write_report};
use pnpm_guard::utils::logger::init_logger;
use pnpm_guard::{Guard, GuardError, GuardResult, Verdict};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_command();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = init_logger(cli.log_level.as_deref(), cli.log_file.clone()) {
        let err = GuardError::logging("failed to initialize logging", err);
        eprintln!("pnpm-guard: {err}");
        if let Some(source) = std::error::Error::source(&err) {
            eprintln!("  caused by: {source}");
        }
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(verdict) => ExitCode::from(verdict.exit_status()),
        Err(err) => {
            tracing::error!(error = %err, "guard failed");
            eprintln!("pnpm-guard: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> GuardResult<Verdict> {
    let guard = Guard::for_current_platform();

    let verdict = if cli.explain {
        let report = guard.explain();
        write_report(&mut io::stdout().lock(), &report, cli.format)?;
        report.verdict
    } else {
        guard.check()
    };

    if !verdict.is_allowed() {
        let stderr = io::stderr();
        colored::control::set_override(banner_colorize(
            cli.no_color,
            stderr.is_terminal(),
            |key| std::env::var(key).ok(),
        ));
        write_banner(&mut stderr.lock())?;
    }

    Ok(verdict)
}
