//! End-to-end pipeline orchestration tests.

#![cfg(unix)]

use cineharvest::config::{BuildConfig, PackageConfig, PipelineConfig, StepConfig};
use cineharvest::pipeline::{Phase, Pipeline, PipelineState};
use cineharvest::sink::MemorySink;

fn sh(description: &str, script: &str) -> StepConfig {
    StepConfig {
        description: description.to_string(),
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

#[tokio::test]
async fn all_phases_complete_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("order.txt");
    let source = dir.path().join("artifact");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("payload.txt"), "payload").unwrap();

    let config = PipelineConfig {
        scrape: vec![
            sh("Scraper One", &format!("echo one >> {}", marker.display())),
            sh("Scraper Two", &format!("echo two >> {}", marker.display())),
        ],
        process: vec![sh(
            "Updater",
            &format!("echo three >> {}", marker.display()),
        )],
        build: Some(BuildConfig {
            step: sh("Build", &format!("echo four >> {}", marker.display())),
            check_args: vec!["-c".to_string(), "true".to_string()],
        }),
        package: Some(PackageConfig {
            source_dir: source,
            versions_dir: dir.path().join("versions"),
            prefix: "Pack".to_string(),
        }),
    };

    let sink = MemorySink::new();
    let state = Pipeline::new(&config, &sink).run().await;

    assert_eq!(state, PipelineState::Completed);
    let order = std::fs::read_to_string(&marker).unwrap();
    assert_eq!(order, "one\ntwo\nthree\nfour\n");

    // The package phase copied the artifact into a dated folder.
    let versions: Vec<_> = std::fs::read_dir(dir.path().join("versions"))
        .unwrap()
        .collect();
    assert_eq!(versions.len(), 1);
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.contains("Total execution time:")));
}

#[tokio::test]
async fn failing_step_halts_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("later-phase.txt");

    let config = PipelineConfig {
        scrape: vec![sh("Good Scraper", "true"), sh("Bad Scraper", "exit 2")],
        process: vec![sh(
            "Updater",
            &format!("touch {}", marker.display()),
        )],
        build: None,
        package: None,
    };

    let sink = MemorySink::new();
    let state = Pipeline::new(&config, &sink).run().await;

    assert_eq!(state, PipelineState::Failed(Phase::Scrape));
    // The process phase never ran.
    assert!(!marker.exists());
    let messages = sink.messages();
    assert!(messages
        .iter()
        .any(|m| m == "Stopping execution due to error in Bad Scraper"));
    assert!(messages
        .iter()
        .any(|m| m == "[-] Bad Scraper failed with return code 2"));
}

#[tokio::test]
async fn missing_build_tool_fails_build_phase() {
    let config = PipelineConfig {
        scrape: vec![],
        process: vec![],
        build: Some(BuildConfig {
            step: StepConfig {
                description: "Ghost Build".to_string(),
                command: "definitely-not-a-real-binary".to_string(),
                args: vec![],
            },
            check_args: vec!["--version".to_string()],
        }),
        package: None,
    };

    let sink = MemorySink::new();
    let state = Pipeline::new(&config, &sink).run().await;

    assert_eq!(state, PipelineState::Failed(Phase::Build));
    assert!(sink
        .messages()
        .iter()
        .any(|m| m == "definitely-not-a-real-binary is not installed or not in PATH"));
}

#[tokio::test]
async fn empty_phases_complete() {
    let config = PipelineConfig::default();
    let sink = MemorySink::new();
    let state = Pipeline::new(&config, &sink).run().await;
    assert_eq!(state, PipelineState::Completed);
    let messages = sink.messages();
    assert!(messages
        .iter()
        .any(|m| m == "No build step configured, skipping"));
    assert!(messages
        .iter()
        .any(|m| m == "No package step configured, skipping"));
}
