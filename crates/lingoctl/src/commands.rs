//! Command handlers for lingoctl.

use crate::cli::Commands;
use crate::display;
use anyhow::{bail, Result};
use lingo_common::progress::{ProgressDelta, EXERCISE_REWARD};
use lingo_common::screens::exercises::Feedback;
use lingo_common::screens::ExerciseScreen;
use lingo_common::AppContext;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use tracing::info;

pub async fn run(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Profile => profile(ctx).await,
        Commands::Rename { name } => rename(ctx, &name).await,
        Commands::Language { name } => language(ctx, &name).await,
        Commands::Path => path(ctx).await,
        Commands::Practice { node } => practice(ctx, node).await,
        Commands::Chat { message } => chat(ctx, &message.join(" ")).await,
        Commands::Translate { text, to } => translate(ctx, &text, &to).await,
        Commands::Flag { language } => {
            println!("{}", display::render_flag(&language));
            Ok(())
        }
        Commands::Reset => reset(ctx).await,
    }
}

async fn profile(ctx: &AppContext) -> Result<()> {
    let screen = ctx.profile_screen();
    screen.load().await?;
    print!("{}", display::render_profile(&screen.state().snapshot()));
    Ok(())
}

async fn rename(ctx: &AppContext, name: &str) -> Result<()> {
    let screen = ctx.profile_screen();
    screen.load().await?;
    screen.open_rename();
    screen.rename_input(name);
    if !screen.confirm_rename().await? {
        bail!("username cannot be blank");
    }
    println!("Now known as {}", screen.state().snapshot().username.bold());
    Ok(())
}

async fn language(ctx: &AppContext, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("language name cannot be blank");
    }
    let screen = ctx.profile_screen();
    screen.select_language(name).await?;
    let state = screen.state().snapshot();
    println!("Learning {} {}", state.current_flag, state.current_language.bold());
    Ok(())
}

async fn path(ctx: &AppContext) -> Result<()> {
    let screen = ctx.path_screen();
    screen.load().await?;
    print!("{}", display::render_path(&screen.state().snapshot()));
    Ok(())
}

async fn practice(ctx: &AppContext, node: Option<usize>) -> Result<()> {
    let screen = ctx.path_screen();
    screen.load().await?;

    let Some(index) = node.or_else(|| screen.next_node()) else {
        println!("Path complete. Pick a node with --node to review.");
        return Ok(());
    };
    let exercises = screen.open(index)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let delta = practice_with(&exercises, stdin.lock(), stdout.lock()).await?;
    if let Some(delta) = delta {
        info!("Practice recorded for {}", delta.language);
    }
    Ok(())
}

/// Drive an exercise set from `input`. Returns the recorded progress, or
/// `None` when input ran out before the set was finished.
pub async fn practice_with<R: BufRead, W: Write>(
    screen: &ExerciseScreen,
    mut input: R,
    mut output: W,
) -> Result<Option<ProgressDelta>> {
    let initial = screen.state().snapshot();
    writeln!(
        output,
        "Node {} in {} ({} exercises{})",
        initial.node,
        initial.language,
        initial.exercises.len(),
        if initial.review { ", review" } else { "" }
    )?;

    loop {
        let state = screen.state().snapshot();
        let Some(exercise) = state.current().cloned() else {
            return Ok(None);
        };

        write!(output, "  {} ({}): ", exercise.prompt.bold(), exercise.hint.dimmed())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            writeln!(output, "Practice stopped, progress not recorded")?;
            return Ok(None);
        }

        screen.answer_input(line.trim());
        let delta = screen.submit().await?;

        match screen.state().snapshot().feedback {
            Some(Feedback::Correct) => writeln!(output, "  {}", "correct".green())?,
            Some(Feedback::Incorrect { expected }) => {
                writeln!(output, "  {} expected: {}", "wrong".red(), expected)?;
                continue;
            }
            None => continue,
        }

        if let Some(delta) = delta {
            writeln!(
                output,
                "Set complete: +{} points for {}",
                EXERCISE_REWARD, delta.language
            )?;
            return Ok(Some(delta));
        }
        if screen.state().snapshot().finished {
            writeln!(output, "Review complete, this node already counted")?;
            return Ok(None);
        }
        screen.next();
    }
}

async fn chat(ctx: &AppContext, message: &str) -> Result<()> {
    let screen = ctx.chat_screen();
    screen.input(message);
    if let Some(handle) = screen.send() {
        handle.await?;
    }

    let state = screen.state().snapshot();
    if let Some(err) = state.last_error {
        bail!(err);
    }
    match state.turns.last() {
        Some(turn) if state.turns.len() > 1 => println!("{}", turn.text),
        _ => bail!("nothing to send"),
    }
    Ok(())
}

async fn translate(ctx: &AppContext, text: &str, to: &str) -> Result<()> {
    let screen = ctx.lookup_screen(to);
    screen.text_input(text);
    if let Some(handle) = screen.translate() {
        handle.await?;
    }

    let state = screen.state().snapshot();
    if let Some(err) = state.last_error {
        bail!(err);
    }
    match state.result {
        Some(translation) => {
            println!("{} {}", state.target_flag, display::render_translation(&translation));
            Ok(())
        }
        None => bail!("nothing to translate"),
    }
}

async fn reset(ctx: &AppContext) -> Result<()> {
    ctx.repository.clear().await?;
    println!("All profiles removed");
    Ok(())
}
