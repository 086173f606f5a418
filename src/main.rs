use std::{process, sync::Arc};

use gradboard::{
    application::{
        error::AppError,
        moderation::{ModerationController, ModerationError},
    },
    config,
    infra::{http::HttpModerationApi, telemetry},
    presentation::{console::Console, prompt::TerminalConfirmation, views::render_notice},
};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
        }
        Err(error) => {
            report_application_error(&error);
            process::exit(error.exit_code());
        }
    }
}

fn report_application_error(error: &AppError) {
    if let AppError::Moderation(moderation) = error {
        eprintln!("{}", render_notice(&moderation.notice()));
        if !matches!(moderation, ModerationError::Api(_)) {
            return;
        }
    }

    let summary = error.report().summary();
    if dispatcher::has_been_set() {
        error!(error = %summary, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %summary, "application error");
    });
}

async fn run() -> Result<String, AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let api = HttpModerationApi::new(&settings.api)?;
    let controller = ModerationController::new(Arc::new(api), settings.moderation.options());
    let mut console = Console::new(controller, settings.moderation.page_size, cli_args.output);

    console
        .execute(cli_args.command, &TerminalConfirmation)
        .await
}
