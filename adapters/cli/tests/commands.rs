use std::process::{Command, Output};

fn maze_runner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-runner"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch maze-runner")
}

#[test]
fn generate_prints_the_maze_and_report() {
    let output = maze_runner(&["generate", "--size", "3x2", "--seed", "7"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "+---+---+---+");
    assert_eq!(lines[4], "+---+---+---+");
    assert!(lines[5].starts_with("size 3x2 | seed 7 |"));
    assert!(lines[5].contains("carved 5"));
}

#[test]
fn generate_is_reproducible_for_a_seed() {
    let first = maze_runner(&["generate", "--size", "10x6", "--seed", "42"]);
    let second = maze_runner(&["generate", "--size", "10x6", "--seed", "42"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn malformed_size_is_rejected() {
    let output = maze_runner(&["generate", "--size", "0x4"]);
    assert!(!output.status.success());
}

#[test]
fn play_presents_scripted_moves() {
    let output = maze_runner(&["play", "--seed", "3", "--moves", "up,left down"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    assert_eq!(stdout.matches("== Maze Runner - level 1 ==").count(), 4);
    assert!(stdout.contains("level 1 | steps"));
}

#[test]
fn play_resumes_from_a_level() {
    let output = maze_runner(&[
        "play", "--seed", "3", "--level", "3", "--size", "8x8", "--moves", "",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    assert!(stdout.starts_with("== Maze Runner - level 3 =="));
}
