//! Integration tests for the vibes CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn vibes() -> Command {
        cargo_bin_cmd!("vibes")
    }

    #[test]
    fn help_displays() {
        vibes()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Study Vibes Radio"));
    }

    #[test]
    fn version_displays() {
        vibes()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("vibes"));
    }

    #[test]
    fn moods_lists_catalog() {
        vibes()
            .arg("moods")
            .assert()
            .success()
            .stdout(predicate::str::contains("lofi"))
            .stdout(predicate::str::contains("jazz"));
    }

    #[test]
    fn status_runs() {
        // Status may report mpv missing, but should not panic
        let _ = vibes().arg("status").assert();
    }

    #[test]
    fn config_path() {
        vibes()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        vibes()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("[player]"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        vibes()
            .args(["config", "set", "player.volume_curve", "log"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key"));
    }

    #[test]
    fn play_unknown_mood_fails_with_hint() {
        vibes()
            .args(["play", "vaporwave", "--no-cache"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown mood"))
            .stderr(predicate::str::contains("vibes moods"));
    }

    #[test]
    fn cache_status_runs() {
        let _ = vibes().args(["cache", "status"]).assert();
    }

    #[test]
    fn cache_gc_help() {
        vibes()
            .args(["cache", "gc", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("retention"));
    }
}
