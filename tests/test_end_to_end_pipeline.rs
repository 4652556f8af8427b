// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end batch run from a configuration file.
//!
//! Synthetic spiking data is written to a temporary data tree, every stage is
//! run through the umbrella crate, and a second run must reuse all tables.

use std::fs;
use std::path::Path;

use serde_json::Value;
use synergy_pid::prelude::*;
use tempfile::TempDir;

const GROUPS: [u32; 3] = [1, 2, 3];
const PATHWAYS: [u32; 2] = [1, 2];
const TIMES: [f64; 2] = [0.0, 10.0];

fn write_hebbian_data(spiking_dir: &Path) {
    let dir = spiking_dir.join("Hebbian");
    fs::create_dir_all(&dir).unwrap();
    for group in GROUPS {
        let mut text = String::new();
        let mut row = 0;
        for k in 1..=3u32 {
            for pathway in PATHWAYS {
                for time in TIMES {
                    for i in 0..25u32 {
                        let ex = ((i * 3 + group + pathway) % 8) as f64;
                        let in1 = if k == 2 { 0.0 } else { ((i * 5 + k) % 4) as f64 };
                        let in2 = if k == 3 { 0.0 } else { ((i * 7) % 5) as f64 };
                        let post = (2.0 * ex - in1 - in2 + time / 10.0).max(0.0);
                        let phasic = [post, ex, in1, in2, ex, in1, in2];
                        let tonic = phasic.map(|c| (c * 1.5).round());
                        let fields: Vec<String> = phasic
                            .iter()
                            .chain(tonic.iter())
                            .map(|c| c.to_string())
                            .collect();
                        text.push_str(&format!(
                            "{} {} {} {} 15 {}\n",
                            row,
                            k,
                            time,
                            pathway,
                            fields.join(" ")
                        ));
                        row += 1;
                    }
                }
            }
        }
        fs::write(dir.join(format!("trials_{}.dat", group)), text).unwrap();
    }
}

fn write_config(root: &TempDir) -> std::path::PathBuf {
    let path = root.path().join("synergy_configuration.toml");
    let toml = format!(
        r#"
[paths]
data_dir = '{}'

[surrogates]
n_surrogates = 2
base_seed = 0

[analysis]
schemes = ["Hebbian"]
regimes = ["phasic", "tonic"]
"#,
        root.path().join("files").display()
    );
    fs::write(&path, toml).unwrap();
    path
}

fn read_value(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_pipeline_from_config() {
    let root = tempfile::tempdir().unwrap();
    let config_path = write_config(&root);
    let config = load_config(Some(config_path.as_path()), None).unwrap();
    validate_config(&config).unwrap();
    write_hebbian_data(&config.paths.spiking_path());

    let ctx = AnalysisContext::from_config(&config).unwrap();
    run_all(&ctx).unwrap();

    let files = root.path().join("files");
    for regime in ["phasic", "tonic"] {
        let trials = read_value(&files.join(format!("results/Hebbian/trials_results_{}.json", regime)));
        assert_eq!(
            trials.as_array().unwrap().len(),
            GROUPS.len() * 3 * PATHWAYS.len() * TIMES.len()
        );

        let summary = read_value(&files.join(format!("results/Hebbian/final_results_{}.json", regime)));
        let summary = summary.as_array().unwrap();
        assert_eq!(summary.len(), 3 * PATHWAYS.len() * TIMES.len());
        assert_eq!(summary[0]["n"], GROUPS.len());

        let p_values = read_value(&files.join(format!("results/Hebbian/p_values_{}.json", regime)));
        assert_eq!(p_values.as_array().unwrap().len(), summary.len());

        for k in 1..=3 {
            for pathway in PATHWAYS {
                let figure = files.join(format!("figures/Hebbian/{}/pid_k{}_pw{}.json", regime, k, pathway));
                assert!(figure.is_file(), "missing {}", figure.display());
            }
        }
    }

    // seeds follow the full (regime, scheme) grid even with one scheme configured
    assert!(files.join("surrogates/Hebbian/trials_surrogate_0_phasic.json").is_file());
    assert!(files.join("surrogates/Hebbian/trials_surrogate_3_tonic.json").is_file());
    let surrogates = read_value(&files.join("surrogates/Hebbian/trials_surrogate_3_tonic.json"));
    let seeds: Vec<u64> = surrogates
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["random_seed"].as_u64().unwrap())
        .collect();
    assert_eq!(seeds.first(), Some(&6));
    assert_eq!(seeds.last(), Some(&7));
}

#[test]
fn test_second_run_reuses_tables() {
    let root = tempfile::tempdir().unwrap();
    let config_path = write_config(&root);
    let config = load_config(Some(config_path.as_path()), None).unwrap();
    write_hebbian_data(&config.paths.spiking_path());
    let ctx = AnalysisContext::from_config(&config).unwrap();

    let first = run_generate(&ctx).unwrap();
    assert!(first.iter().all(|o| matches!(o, GenerateOutcome::Written(_))));
    let trials = files_snapshot(&ctx.results_dir);

    let second = run_generate(&ctx).unwrap();
    assert!(second.iter().all(|o| matches!(o, GenerateOutcome::Skipped(_))));
    assert_eq!(files_snapshot(&ctx.results_dir), trials);
}

fn files_snapshot(dir: &Path) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = fs::read_dir(dir.join("Hebbian"))
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            (
                path.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read_to_string(&path).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_unknown_scheme_in_config() {
    let mut config = SynergyConfig::default();
    config.analysis.schemes = vec!["Hebbian".to_string(), "BCM".to_string()];
    assert!(validate_config(&config).is_err());
    let err = AnalysisContext::from_config(&config).unwrap_err();
    assert!(matches!(err, AnalysisError::Spiking(_)));
}
