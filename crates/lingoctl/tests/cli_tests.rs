//! CLI parsing and interactive practice tests.

use clap::Parser;
use lingo_common::config::ProfileSettings;
use lingo_common::screens::profile::{reduce, ProfileEvent, ProfileState};
use lingo_common::screens::PathScreen;
use lingo_common::{ProfileRepository, ProfileStore, UserProfile};
use lingoctl::commands::practice_with;
use lingoctl::display::render_profile;
use lingoctl::{Cli, Commands};
use std::io::Cursor;
use std::path::PathBuf;

#[test]
fn parses_translate_with_target() {
    let cli = Cli::try_parse_from(["lingoctl", "translate", "good night", "--to", "German"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Translate {
            text: "good night".into(),
            to: "German".into()
        }
    );
    assert!(cli.config.is_none());
}

#[test]
fn parses_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["lingoctl", "practice", "--node", "3", "--config", "/tmp/l.toml"]).unwrap();
    assert_eq!(cli.command, Commands::Practice { node: Some(3) });
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/l.toml")));
}

#[test]
fn chat_joins_words_and_requires_one() {
    let cli = Cli::try_parse_from(["lingoctl", "chat", "wie", "geht's?"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Chat {
            message: vec!["wie".into(), "geht's?".into()]
        }
    );
    assert!(Cli::try_parse_from(["lingoctl", "chat"]).is_err());
    assert!(Cli::try_parse_from(["lingoctl", "translate", "hi"]).is_err());
}

#[test]
fn profile_rendering_lists_languages() {
    let mut profile = UserProfile::new("ana", "German");
    lingo_common::progress::record_exercise(&mut profile, None);

    let mut state = ProfileState::default();
    reduce(&mut state, ProfileEvent::Loaded(profile));
    let out = render_profile(&state);

    assert!(out.contains("ana"));
    assert!(out.contains("[LANGUAGES]"));
    assert!(out.contains("German"));
    assert!(out.contains("Total points:   10"));
}

async fn spanish_path() -> (ProfileRepository, PathScreen) {
    let repo = ProfileRepository::new(ProfileStore::open_in_memory().unwrap());
    let defaults = ProfileSettings {
        username: "ana".into(),
        language: "Spanish".into(),
    };
    let screen = PathScreen::new(repo.clone(), defaults);
    screen.load().await.unwrap();
    (repo, screen)
}

#[tokio::test]
async fn practice_records_after_retry() {
    let (repo, path) = spanish_path().await;
    let exercises = path.open(0).unwrap();

    // Node 0 asks for hello, thank you, water
    let input = Cursor::new("ola\nhola\n¡Gracias!\n  agua \n");
    let mut output = Vec::new();
    let delta = practice_with(&exercises, input, &mut output).await.unwrap();

    let delta = delta.unwrap();
    assert_eq!(delta.language, "Spanish");
    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("expected: hola"));
    assert!(printed.contains("Set complete: +10 points for Spanish"));

    let profile = repo.list_all().await.unwrap().remove(0);
    assert_eq!(profile.total_points, 10);
}

#[tokio::test]
async fn practice_stops_on_end_of_input() {
    let (repo, path) = spanish_path().await;
    let exercises = path.open(0).unwrap();

    let mut output = Vec::new();
    let delta = practice_with(&exercises, Cursor::new("hola\n"), &mut output)
        .await
        .unwrap();

    assert!(delta.is_none());
    assert!(String::from_utf8(output).unwrap().contains("progress not recorded"));
    assert_eq!(repo.list_all().await.unwrap()[0].total_points, 0);
}

#[tokio::test]
async fn practice_review_of_completed_node_ends() {
    let (repo, path) = spanish_path().await;
    let mut profile = repo.list_all().await.unwrap().remove(0);
    lingo_common::progress::record_exercise(&mut profile, None);
    repo.update(profile).await.unwrap();
    path.load().await.unwrap();

    let review = path.open(0).unwrap();
    let mut output = Vec::new();
    let delta = practice_with(&review, Cursor::new("hola\ngracias\nagua\n"), &mut output)
        .await
        .unwrap();

    assert!(delta.is_none());
    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains(", review)"));
    assert!(printed.contains("Review complete"));
    assert_eq!(repo.list_all().await.unwrap()[0].total_points, 10);
}

#[tokio::test]
async fn flag_lookup_leaves_storage_alone() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("profile.db");
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!("[storage]\ndb_path = {:?}\n", db.display().to_string()),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "lingoctl",
        "--config",
        config.to_str().unwrap(),
        "flag",
        "German",
    ])
    .unwrap();
    lingoctl::run(cli).await.unwrap();
    assert!(!db.exists());

    // The same config does open the store for a command that needs it
    let cli = Cli::try_parse_from(["lingoctl", "--config", config.to_str().unwrap(), "reset"]).unwrap();
    lingoctl::run(cli).await.unwrap();
    assert!(db.exists());
}

#[test]
fn flag_command_without_config() {
    let cli = Cli::try_parse_from(["lingoctl", "flag", "English (American)"]).unwrap();
    match cli.command {
        Commands::Flag { language } => {
            assert!(lingoctl::display::render_flag(&language).contains("(us)"))
        }
        other => panic!("unexpected command: {:?}", other),
    }
}
