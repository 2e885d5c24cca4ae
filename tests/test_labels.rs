extern crate vision_pipeline;

use std::path::PathBuf;
use vision_pipeline::common::{LabelTable, ModelConfig, IMAGENET_MEAN};
use vision_pipeline::data::{NmsMode, PipelineMode};
use vision_pipeline::{PipelineConfig, PipelineError};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vision_pipeline_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn plain_text_labels() {
    let table = LabelTable::from_lines("person\nbicycle\n  car  \n\n\n");
    assert_eq!(table.names(), &["person", "bicycle", "car"]);
    assert_eq!(table.get(2).unwrap(), "car");
}

#[test]
fn out_of_range_lookup() {
    let table = LabelTable::new(&["a", "b"]);
    match table.get(5) {
        Err(PipelineError::Index { index, len }) => assert_eq!((index, len), (5, 2)),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(table.name(5), None);
    assert_eq!(table.name(1).as_deref(), Some("b"));
    assert_eq!(LabelTable::empty().name(0), None);
}

#[test]
fn json_label_layouts() {
    let flat = LabelTable::from_json(r#"["tench", "goldfish"]"#).unwrap();
    assert_eq!(flat.names(), &["tench", "goldfish"]);

    let pairs = LabelTable::from_json(r#"[["n01440764", "tench"], ["n01443537", "goldfish"]]"#).unwrap();
    assert_eq!(pairs, flat);

    let indexed = LabelTable::from_json(r#"{"0": ["n01440764", "tench"], "2": "great white shark"}"#).unwrap();
    assert_eq!(indexed.names(), &["tench", "# 1", "great white shark"]);

    assert!(LabelTable::from_json("42").is_err());
    assert!(LabelTable::from_json(r#"{"zero": "tench"}"#).is_err());
    assert!(LabelTable::from_json("not json").is_err());
}

#[test]
fn yaml_names_block() {
    let yaml = "path: ../datasets/coco\n\
                train: images/train2017\n\
                names:\n  \
                  0: person\n  \
                  1: 'traffic light'\n  \
                  3: \"stop sign\"\n\
                download: |\n  \
                  echo done\n";
    let table = LabelTable::from_yaml(yaml).unwrap();
    assert_eq!(table.names(), &["person", "traffic light", "# 2", "stop sign"]);

    let inline = LabelTable::from_yaml("nc: 2\nnames: ['cat', 'dog']\n").unwrap();
    assert_eq!(inline.names(), &["cat", "dog"]);

    assert!(LabelTable::from_yaml("nc: 0\n").is_err());
}

#[test]
fn onnx_metadata_names() {
    let table = LabelTable::from_metadata(r#"{0: 'person', 1: 'bicycle', 2: "yellow_lady's_slipper"}"#);
    assert_eq!(table.len(), 3);
    assert_eq!(table.names()[0], "person");
    assert_eq!(table.names()[1], "bicycle");
}

#[tokio::test]
async fn load_dispatches_on_extension() {
    let txt = scratch_file("labels.txt", "person\ndog\n");
    let json = scratch_file("labels.json", r#"["person", "dog"]"#);
    let yaml = scratch_file("coco.yaml", "names:\n  0: person\n  1: dog\n");

    let expected = LabelTable::new(&["person", "dog"]);
    assert_eq!(LabelTable::load(&txt).await.unwrap(), expected);
    assert_eq!(LabelTable::load(&json).await.unwrap(), expected);
    assert_eq!(LabelTable::load(&yaml).await.unwrap(), expected);

    let broken = scratch_file("broken.json", "{");
    assert!(LabelTable::load(&broken).await.is_err());
    assert!(LabelTable::load_or_empty(&broken).await.is_empty());
    assert!(LabelTable::load_or_empty("/no/such/labels.txt").await.is_empty());
}

#[tokio::test]
async fn model_config_labels() {
    let txt = scratch_file("model_labels.txt", "a\nb\nc\n");
    let model = ModelConfig::new(
        "model.onnx".to_string(),
        Some(txt.to_string_lossy().to_string()),
        PipelineConfig::classification(),
    );
    assert_eq!(model.load_labels().await.len(), 3);

    let unlabeled = ModelConfig::new("model.onnx".to_string(), None, PipelineConfig::detection());
    assert!(unlabeled.load_labels().await.is_empty());
}

#[test]
fn config_presets() {
    let det = PipelineConfig::default();
    assert_eq!(det.mode, PipelineMode::Detection);
    assert_eq!((det.model_width, det.model_height), (640, 640));
    assert_eq!(det.mean, [0.0; 3]);
    assert_eq!(det.std, [1.0; 3]);
    assert_eq!(det.confidence_threshold, 0.5);
    assert_eq!(det.iou_threshold, 0.5);
    assert_eq!(det.nms_mode, NmsMode::ClassAgnostic);
    assert!(det.validate().is_ok());

    let cls = PipelineConfig::classification();
    assert_eq!(cls.mode, PipelineMode::Classification);
    assert_eq!((cls.model_width, cls.model_height), (224, 224));
    assert_eq!(cls.mean, IMAGENET_MEAN);
    assert_eq!(cls.std, [0.229, 0.224, 0.225]);
    assert!(cls.validate().is_ok());
}

#[test]
fn config_from_json() {
    let config = PipelineConfig::from_json(
        r#"{"mode": "classification", "model_width": 320, "nms_mode": "per_class", "inference_timeout_ms": 1500}"#,
    )
    .unwrap();
    assert_eq!(config.mode, PipelineMode::Classification);
    assert_eq!((config.model_width, config.model_height), (320, 640));
    assert_eq!(config.nms_mode, NmsMode::PerClass);
    assert_eq!(config.inference_timeout(), Some(std::time::Duration::from_millis(1500)));
    assert_eq!(config.output_name, None);

    assert!(PipelineConfig::from_json(r#"{"mode": "segmentation"}"#).is_err());

    let model: ModelConfig = serde_json::from_str(r#"{"weights_path": "yolo11n.onnx"}"#).unwrap();
    assert_eq!(model.pipeline, PipelineConfig::detection());
    assert_eq!(model.labels_path, None);
}

#[test]
fn config_validation() {
    let cases = [
        PipelineConfig::detection().with_model_size(0, 640),
        PipelineConfig::detection().with_std([1.0, 0.0, 1.0]),
        PipelineConfig::detection().with_mean([f32::NAN, 0.0, 0.0]),
        PipelineConfig::detection().with_confidence_threshold(-0.1),
        PipelineConfig::detection().with_iou_threshold(1.01),
    ];
    for config in cases {
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))), "{config:?}");
    }
}

#[test]
fn mode_names() {
    assert_eq!(PipelineMode::from_str("Detect"), Some(PipelineMode::Detection));
    assert_eq!(PipelineMode::from_str("classification"), Some(PipelineMode::Classification));
    assert_eq!(PipelineMode::from_str("pose"), None);
    assert_eq!(NmsMode::from_str("per_class"), Some(NmsMode::PerClass));
    assert_eq!(NmsMode::ClassAgnostic.as_str(), "class_agnostic");
}

#[test]
fn yaml_block_list() {
    let yaml = "path: ../datasets/VOC\n\
                names:\n  \
                  - aeroplane\n  \
                  - 'bicycle'\n  \
                  - \"potted plant\"\n\
                download: |\n  \
                  - not a label\n";
    let table = LabelTable::from_yaml(yaml).unwrap();
    assert_eq!(table.names(), &["aeroplane", "bicycle", "potted plant"]);

    let flush = LabelTable::from_yaml("names:\n- cat\n- dog\nnc: 2\n").unwrap();
    assert_eq!(flush.names(), &["cat", "dog"]);
}

#[test]
fn timeout_rounds_up_to_a_millisecond() {
    let config = PipelineConfig::detection().with_inference_timeout(std::time::Duration::from_micros(300));
    assert_eq!(config.inference_timeout_ms, Some(1));
    assert!(config.validate().is_ok());

    let config = PipelineConfig::detection().with_inference_timeout(std::time::Duration::from_micros(2_500));
    assert_eq!(config.inference_timeout_ms, Some(3));

    let zero = PipelineConfig::detection().with_inference_timeout(std::time::Duration::ZERO);
    assert!(matches!(zero.validate(), Err(PipelineError::InvalidConfig(_))));
}

#[test]
fn model_config_from_file() {
    let path = scratch_file(
        "model.json",
        r#"{
            "weights_path": "models/yolo11n.onnx",
            "labels_path": "models/labels_80.txt",
            "ort_lib_path": "onnxruntime/libonnxruntime.so",
            "pipeline": {"confidence_threshold": 0.3, "max_detections": 100}
        }"#,
    );
    let model = ModelConfig::from_json_file(&path).unwrap();
    assert_eq!(model.weights_path, "models/yolo11n.onnx");
    assert_eq!(model.ort_lib_path.as_deref(), Some("onnxruntime/libonnxruntime.so"));
    assert_eq!(model.pipeline.confidence_threshold, 0.3);
    assert_eq!(model.pipeline.max_detections, Some(100));
    assert_eq!(model.pipeline.model_width, 640);

    let broken = scratch_file("broken_model.json", r#"{"labels_path": "x.txt"}"#);
    assert!(ModelConfig::from_json_file(&broken).is_err());
    assert!(ModelConfig::from_json_file("/no/such/model.json").is_err());
}
