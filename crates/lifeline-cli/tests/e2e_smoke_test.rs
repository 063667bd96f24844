use std::{fs, path::PathBuf};

use tempfile::tempdir;

use lifeline_cli::Args;

/// Collects all .seq files from a directory
fn collect_seq_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("seq")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args_for(input: &PathBuf, output: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        theme: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_seq_files(PathBuf::from("../../demos"));

    assert!(!valid_demos.is_empty(), "No demo files found in demos/");

    let mut failed = Vec::new();

    for demo_path in &valid_demos {
        let output_filename =
            format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        if let Err(e) = lifeline_cli::run(&args_for(demo_path, &output_path)) {
            failed.push((demo_path.clone(), e));
            continue;
        }

        let svg = fs::read_to_string(&output_path).expect("output file should exist");
        assert!(
            svg.starts_with("<svg"),
            "{} produced non-SVG output",
            demo_path.display()
        );
    }

    if !failed.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_seq_files(PathBuf::from("../../demos/errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join("out.svg");

        let result = lifeline_cli::run(&args_for(demo_path, &output_path));
        assert!(
            result.is_err(),
            "{} should have failed to process",
            demo_path.display()
        );
    }
}

#[test]
fn e2e_sketch_theme_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let input = temp_dir.path().join("diagram.seq");
    fs::write(&input, "Alice->Bob: Hello").expect("write input");
    let output = temp_dir.path().join("diagram.svg");

    let mut args = args_for(&input, &output);
    args.theme = Some("sketch".to_string());

    lifeline_cli::run(&args).expect("sketch render should succeed");
    let svg = fs::read_to_string(&output).expect("output file should exist");
    assert!(svg.starts_with("<svg"));
}

#[test]
fn e2e_unknown_theme_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let input = temp_dir.path().join("diagram.seq");
    fs::write(&input, "Alice->Bob: Hello").expect("write input");

    let mut args = args_for(&input, &temp_dir.path().join("out.svg"));
    args.theme = Some("neon".to_string());

    assert!(lifeline_cli::run(&args).is_err());
}

#[test]
fn e2e_missing_input_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let args = args_for(
        &temp_dir.path().join("does_not_exist.seq"),
        &temp_dir.path().join("out.svg"),
    );

    assert!(lifeline_cli::run(&args).is_err());
}
