mod common;

use std::fs;
use std::path::PathBuf;

use embed::{
    generate_action_embeddings, l2_norm, ActionPrompt, ActionTable, EmbedConfig, EmbedError,
};

fn stub_config(asset_dir: PathBuf) -> EmbedConfig {
    EmbedConfig {
        mode: "stub".into(),
        asset_dir,
        tokenizer_url: None,
        stub_dim: 512,
        ..Default::default()
    }
}

#[test]
fn writes_table_next_to_encoder() {
    let dir = tempfile::tempdir().unwrap();
    common::write_tokenizer(dir.path());
    let cfg = stub_config(dir.path().to_path_buf());

    let report = generate_action_embeddings(&cfg).expect("stub generation");

    assert_eq!(report.output_path, dir.path().join("action_embeddings.json"));
    assert_eq!(report.entries, 5);
    assert_eq!(report.dimension, 512);

    let table = ActionTable::load(&report.output_path).unwrap();
    let ids: Vec<_> = table.ids().collect();
    assert_eq!(ids, ["TEXT", "SCENERY", "PERSON", "FOOD", "OBJECT"]);
    for (id, vector) in table.iter() {
        assert_eq!(vector.len(), 512, "{id}");
        assert!((l2_norm(vector) - 1.0).abs() < 1e-5, "{id}");
    }
}

#[test]
fn single_text_entry_scenario() {
    let dir = tempfile::tempdir().unwrap();
    common::write_tokenizer(dir.path());
    let cfg = EmbedConfig {
        actions: vec![ActionPrompt::new(
            "TEXT",
            "a photo of a document, book, paper, text, receipt, sign, handwriting",
        )],
        ..stub_config(dir.path().to_path_buf())
    };

    let report = generate_action_embeddings(&cfg).unwrap();

    let raw = fs::read_to_string(&report.output_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().expect("top-level object");
    assert_eq!(object.len(), 1);
    let vector: Vec<f32> = object["TEXT"]
        .as_array()
        .expect("numeric array")
        .iter()
        .map(|x| x.as_f64().expect("number") as f32)
        .collect();
    assert_eq!(vector.len(), 512);
    assert!((l2_norm(&vector) - 1.0).abs() < 1e-5);
}

#[test]
fn rerun_produces_identical_file() {
    let dir = tempfile::tempdir().unwrap();
    common::write_tokenizer(dir.path());
    let cfg = stub_config(dir.path().to_path_buf());

    let first = generate_action_embeddings(&cfg).unwrap();
    let first_bytes = fs::read(&first.output_path).unwrap();
    let second = generate_action_embeddings(&cfg).unwrap();
    let second_bytes = fs::read(&second.output_path).unwrap();

    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn missing_encoder_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    common::write_tokenizer(dir.path());
    let cfg = EmbedConfig {
        mode: "onnx".into(),
        ..stub_config(dir.path().to_path_buf())
    };

    let err = generate_action_embeddings(&cfg).unwrap_err();

    assert!(matches!(err, EmbedError::ModelNotFound(_)));
    assert!(!dir.path().join("action_embeddings.json").exists());
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    common::write_tokenizer(dir.path());
    let cfg = EmbedConfig {
        mode: "gpu".into(),
        ..stub_config(dir.path().to_path_buf())
    };

    assert!(matches!(
        generate_action_embeddings(&cfg),
        Err(EmbedError::InvalidConfig(_))
    ));
}

#[test]
fn relative_asset_dir_ignores_working_directory() {
    let base = tempfile::tempdir().unwrap();
    common::write_tokenizer(&base.path().join("assets").join("mobileclip_s0"));
    let cfg = EmbedConfig {
        asset_dir: PathBuf::from("assets/mobileclip_s0"),
        base_dir: Some(base.path().to_path_buf()),
        ..stub_config(PathBuf::new())
    };

    let report = generate_action_embeddings(&cfg).unwrap();
    assert!(report.output_path.starts_with(base.path()));
    assert!(report.output_path.exists());
}

#[test]
#[ignore = "requires MobileCLIP text encoder + tokenizer under assets/mobileclip_s0"]
fn real_mobileclip_encoder() {
    let asset_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
        .join("mobileclip_s0");
    let scratch = tempfile::tempdir().unwrap();
    for name in ["text_model_uint8.onnx", "tokenizer.json"] {
        fs::copy(asset_dir.join(name), scratch.path().join(name))
            .unwrap_or_else(|e| panic!("expected {name} under {}: {e}", asset_dir.display()));
    }
    let cfg = EmbedConfig {
        asset_dir: scratch.path().to_path_buf(),
        tokenizer_url: None,
        ..Default::default()
    };

    let report = generate_action_embeddings(&cfg).expect("inference with real model");
    let table = ActionTable::load(&report.output_path).unwrap();
    assert_eq!(table.len(), 5);
    assert!(report.dimension > 0);
    assert_eq!(table.validate(1e-5).unwrap(), report.dimension);

    // Each prompt should be its own best match.
    for (id, vector) in table.iter() {
        assert_eq!(table.best_match(vector).map(|(best, _)| best), Some(id));
    }
}
