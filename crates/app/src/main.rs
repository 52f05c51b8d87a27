mod cli;
mod console;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use services::{QuizError, QuizLoop, QuizPlan};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{ArgsError, Cli};
use crate::console::{Console, LineAnswers, render_summary};

fn init_logging(cli: &Cli) {
    // RUST_LOG is not consulted.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level().as_str()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.quiz_config()?;
    let notes = cli.read_notes()?;

    let plan = QuizPlan::build(&notes, &config)?;
    info!(
        passages = plan.passages().len(),
        eligible = plan.eligible().len(),
        "notes loaded"
    );

    let mut quiz = QuizLoop::new(&plan, &config)?;
    let mut stats = quiz.begin();
    let mut answers = LineAnswers::new(io::stdin().lock());
    let mut console = Console::new(io::stdout().lock(), cli.quiet);

    let outcome = quiz.run(&mut answers, &mut console, &mut stats)?;

    let mut out = console.finish().context("failed to write to stdout")?;
    let summary = quiz.finish(&stats);
    render_summary(&mut out, &summary, outcome, cli.format)
        .context("failed to write the session summary")?;
    Ok(())
}

/// 2 for bad arguments, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let bad_args = err.downcast_ref::<ArgsError>().is_some()
        || err.downcast_ref::<QuizError>().is_some_and(QuizError::is_config);
    if bad_args { 2 } else { 1 }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // At this layer (binary glue), printing once is fine.
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
