//! kwctl - Main entry point

use clap::{CommandFactory, Parser};
use log::debug;
use std::process::ExitCode;

use kwctl::context::{
    run_config_command, run_init_command, run_ns_command, run_show_command, run_source_command,
};
use kwctl::nodeshell::{run_cp_command, run_exec_command, run_login_command};
use kwctl::ui::TerminalPrompter;
use kwctl::workload::{run_restart_command, run_scale_command, run_set_image_command};
use kwctl::{ActiveState, Cli, Command, KwError, Kubectl, Result, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    debug!("Starting kwctl v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !matches!(e, KwError::Canceled) {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref(), cli.default_config)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Err(KwError::InvalidInput("a subcommand is required".to_string()));
    };

    let kubectl = Kubectl::new(&settings.kubectl.name, &settings.kubectl.args);
    let prompter = TerminalPrompter::new(&settings.editor);

    match &command {
        Command::Config(args) => run_config_command(&settings, ActiveState::from_env(), &prompter, args),
        Command::Ns(args) => {
            run_ns_command(&settings, ActiveState::from_env(), &prompter, &kubectl, args).await
        }
        Command::Show => run_show_command(&settings, &ActiveState::from_env()),
        Command::Source(args) => run_source_command(&settings, args),
        Command::Init(args) => run_init_command(&settings, args),
        Command::Login(args) => run_login_command(&kubectl, &settings.nodeshell, args).await,
        Command::Exec(args) => run_exec_command(&kubectl, &settings.nodeshell, args).await,
        Command::Cp(args) => run_cp_command(&kubectl, &settings.nodeshell, args).await,
        Command::Scale(args) => {
            run_scale_command(&kubectl, &prompter, &ActiveState::from_env(), args).await
        }
        Command::Restart(args) => {
            run_restart_command(&kubectl, &prompter, &ActiveState::from_env(), args).await
        }
        Command::SetImage(args) => {
            run_set_image_command(&kubectl, &prompter, &ActiveState::from_env(), args).await
        }
    }
}
