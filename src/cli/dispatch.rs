use clap::Parser;

use super::args::*;
use super::human::print_user_error_human;
use super::json::print_anyhow_error;

use crate::paths::BuildyardHome;

pub fn run() -> std::process::ExitCode {
    let cli = Cli::parse();
    match run_with(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if cli.json {
                print_anyhow_error(&cli, &err);
            } else if !print_user_error_human(&err) {
                eprintln!("{err:#}");
            }

            std::process::ExitCode::from(1)
        }
    }
}

fn run_with(cli: &Cli) -> anyhow::Result<()> {
    let home = BuildyardHome::resolve()?;
    let ctx = super::commands::Ctx { cli, home: &home };

    match &cli.command {
        Commands::Checkout {
            reference,
            project,
            branch,
            commit,
            dest,
            depth,
            key_file,
        } => {
            super::commands::checkout::run(
                &ctx,
                reference.as_deref(),
                project.as_deref(),
                branch,
                commit,
                dest.as_deref(),
                *depth,
                key_file.as_deref(),
            )?;
        }
        Commands::Doctor => {
            super::commands::doctor::run(&ctx)?;
        }
    }

    Ok(())
}
