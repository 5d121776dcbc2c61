use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

use quiz_client::terminal::{HELP, TerminalCommand, TerminalView, parse_command};
use quiz_client::{Config, HttpQuizApi, PlayerSettings, QuizApi, QuizPlayer};
use quiz_core::QuizValidator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let quiz_id = std::env::args()
        .nth(1)
        .context("usage: quiz-play <quiz-id>")?;

    info!("Loading quiz {} from {}", quiz_id, config.api_url);
    let api = Arc::new(HttpQuizApi::new(
        config.api_url.clone(),
        config.request_timeout,
    )?);
    let quiz = Arc::new(
        api.fetch_quiz(&quiz_id)
            .await
            .with_context(|| format!("failed to load quiz {}", quiz_id))?,
    );

    for issue in QuizValidator::validate(&quiz) {
        warn!("Quiz {} has a problem: {}", quiz.id, issue);
    }

    let mut player = QuizPlayer::new(api, quiz.clone(), PlayerSettings::from(&config));
    player.add_handler(Box::new(TerminalView::new(quiz.clone())));
    let mut handle = player.spawn();

    println!("{}", HELP);

    let commands = handle.commands();
    let (quit_tx, quit_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(TerminalCommand::Player(command)) => {
                    if commands.send(command).await.is_err() {
                        break;
                    }
                }
                Some(TerminalCommand::Help) => println!("{}", HELP),
                Some(TerminalCommand::Quit) => break,
                None => {}
            }
        }
        let _ = quit_tx.send(());
    });

    tokio::select! {
        result = handle.finished() => {
            let result = result?;
            info!(
                "Attempt finished with {}% ({} of {} points)",
                result.percentage, result.earned_points, result.total_points
            );
        }
        _ = quit_rx => {
            info!("Leaving quiz {} without finishing", quiz.id);
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, abandoning attempt");
        }
    }

    // Dropping the handle tears down the timer and any pending request
    drop(handle);
    Ok(())
}
