use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    raw_path: PathBuf,
}

impl TestContext {
    /// Six athletes ride five segments in June and again in August.
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let raw_path = dir.path().join("efforts.jsonl");
        let mut file = File::create(&raw_path).unwrap();

        let mut activity = 0;
        for (day, month_boost) in [("2015-06-10T08:00:00Z", 0.0), ("2015-08-10T08:00:00Z", 0.2)] {
            for athlete in 1..=6u64 {
                activity += 1;
                for segment in 1..=5u64 {
                    let speed = 3.0 + athlete as f64 * 0.5 + segment as f64 * 0.3 + month_boost;
                    writeln!(
                        file,
                        concat!(
                            r#"{{"athlete":{{"id":{}}},"segment":{{"id":{},"average_grade":{},"#,
                            r#""distance":1000.0,"elevation_low":5.0,"elevation_high":{},"#,
                            r#""maximum_grade":{}}},"activity":{{"id":{}}},"distance":1000.0,"#,
                            r#""elapsed_time":{},"moving_time":{},"start_date_local":"{}"}}"#
                        ),
                        athlete,
                        segment,
                        segment as f64 * 1.5,
                        5.0 + segment as f64 * 15.0,
                        segment as f64 * 3.0,
                        activity,
                        1000.0 / speed,
                        1000.0 / speed,
                        day
                    )
                    .unwrap();
                }
            }
        }

        Self { dir, raw_path }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

const BUNDLE: &str = "leaderboards.json";

fn segrank() -> Command {
    Command::cargo_bin("segrank").expect("segrank binary")
}

fn stdout_of(args: &[&str]) -> String {
    let assert = segrank().args(args).assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

#[test]
fn test_clean_with_split() {
    let ctx = TestContext::new();
    let train = ctx.path("train.csv");
    let test = ctx.path("test.csv");

    segrank()
        .args(["clean", "-i", ctx.raw_path.to_str().unwrap()])
        .args(["-o", train.to_str().unwrap()])
        .args(["--split-date", "2015-07-01", "--test-output", test.to_str().unwrap()])
        .assert()
        .success();

    // header + 30 efforts on each side
    assert_eq!(fs::read_to_string(&train).unwrap().lines().count(), 31);
    assert_eq!(fs::read_to_string(&test).unwrap().lines().count(), 31);
}

#[test]
fn test_train_then_rank() {
    let ctx = TestContext::new();
    let ratings_dir = ctx.path("ratings");
    let boards_dir = ctx.path("boards");
    let raw = ctx.raw_path.to_str().unwrap();

    segrank()
        .args(["train", "-e", raw, "-o", ratings_dir.to_str().unwrap()])
        .args(["--num-factors", "2", "--learning-rate", "0.02"])
        .assert()
        .success();

    let athletes = ratings_dir.join("athlete_ratings.csv");
    let segments = ratings_dir.join("segment_ratings.csv");
    assert!(athletes.exists());
    assert!(segments.exists());
    assert!(ratings_dir.join("orientation_filters.json").exists());
    assert!(fs::read_to_string(&athletes)
        .unwrap()
        .starts_with("athlete_id,rating_1,rating_2"));

    let stdout = stdout_of(&[
        "rank",
        "-e",
        raw,
        "--athletes",
        athletes.to_str().unwrap(),
        "--segments",
        segments.to_str().unwrap(),
        "--filters",
        ratings_dir.join("orientation_filters.json").to_str().unwrap(),
        "-o",
        boards_dir.to_str().unwrap(),
        "--board-size",
        "3",
    ]);
    assert!(stdout.contains("Rank"));

    for name in [
        "athlete_rating_1_leaderboard.csv",
        "athlete_rating_2_leaderboard.csv",
        "segment_rating_1_leaderboard.csv",
        "segment_rating_2_leaderboard.csv",
        "leaderboards.json",
    ] {
        assert!(boards_dir.join(name).exists(), "missing {}", name);
    }
    let board = fs::read_to_string(boards_dir.join("athlete_rating_1_leaderboard.csv")).unwrap();
    assert_eq!(board.lines().count(), 4);
}

#[test]
fn test_train_named_subset() {
    let ctx = TestContext::new();
    let subsets = ctx.path("subsets.json");
    fs::write(&subsets, r#"{ "steep": { "GradeAtLeast": 4.0 } }"#).unwrap();
    let out = ctx.path("ratings");

    segrank()
        .args(["train", "-e", ctx.raw_path.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .args(["--subset", "steep", "--subsets", subsets.to_str().unwrap()])
        .args(["--num-factors", "1"])
        .assert()
        .success();

    let header = fs::read_to_string(out.join("steep_segment_ratings.csv")).unwrap();
    assert!(header.starts_with("segment_id,steep_rating_1"));
    let filters = fs::read_to_string(out.join("orientation_filters.json")).unwrap();
    assert!(filters.contains("steep_rating_1"));
    assert!(filters.contains("GradeAtLeast"));
}

#[test]
fn test_unknown_subset_fails() {
    let ctx = TestContext::new();
    let subsets = ctx.path("subsets.json");
    fs::write(&subsets, r#"{ "steep": { "GradeAtLeast": 4.0 } }"#).unwrap();

    segrank()
        .args(["train", "-e", ctx.raw_path.to_str().unwrap()])
        .args(["-o", ctx.path("out").to_str().unwrap()])
        .args(["--subset", "flat", "--subsets", subsets.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_rank_unknown_column_fails() {
    let ctx = TestContext::new();
    let ratings_dir = ctx.path("ratings");
    let boards_dir = ctx.path("boards");
    let raw = ctx.raw_path.to_str().unwrap();

    segrank()
        .args(["train", "-e", raw, "-o", ratings_dir.to_str().unwrap(), "--num-factors", "2"])
        .assert()
        .success();

    let athletes = ratings_dir.join("athlete_ratings.csv");
    segrank()
        .args(["rank", "-e", raw, "--athletes", athletes.to_str().unwrap()])
        .args(["-o", boards_dir.to_str().unwrap(), "--column", "rating_99"])
        .assert()
        .failure();
    assert!(!boards_dir.join(BUNDLE).exists());

    let stdout = stdout_of(&[
        "rank",
        "-e",
        raw,
        "--athletes",
        athletes.to_str().unwrap(),
        "-o",
        boards_dir.to_str().unwrap(),
        "--column",
        "rating_2",
    ]);
    assert!(stdout.contains("rating_2"));
}

#[test]
fn test_rank_needs_a_ratings_table() {
    let ctx = TestContext::new();
    segrank()
        .args(["rank", "-e", ctx.raw_path.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_evaluate_json() {
    let ctx = TestContext::new();
    let stdout = stdout_of(&[
        "evaluate",
        "-e",
        ctx.raw_path.to_str().unwrap(),
        "--split-date",
        "2015-07-01",
        "--num-factors",
        "2",
        "--json",
    ]);
    assert!(stdout.contains("\"baseline_rmse\""));
    assert!(stdout.contains("\"evaluated\": 30"));
}

#[test]
fn test_config_file_is_merged() {
    let ctx = TestContext::new();
    let config = ctx.path("config.json");
    fs::write(&config, r#"{ "train": { "num_factors": 3, "max_iterations": 20 } }"#).unwrap();
    let out = ctx.path("ratings");

    segrank()
        .args(["--config", config.to_str().unwrap()])
        .args(["train", "-e", ctx.raw_path.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success();

    let header = fs::read_to_string(out.join("athlete_ratings.csv")).unwrap();
    assert!(header.starts_with("athlete_id,rating_1,rating_2,rating_3\n"));
}

#[test]
fn test_correlate_prints_table() {
    let ctx = TestContext::new();
    let out = ctx.path("ratings");
    let raw = ctx.raw_path.to_str().unwrap();

    segrank()
        .args(["train", "-e", raw, "-o", out.to_str().unwrap(), "--num-factors", "2"])
        .assert()
        .success();

    let stdout = stdout_of(&[
        "correlate",
        "-s",
        out.join("segment_ratings.csv").to_str().unwrap(),
        "-e",
        raw,
    ]);
    assert!(stdout.contains("Pearson r"));
    assert!(stdout.contains("seg_average_grade"));
}
