//! Integration tests for the base object-graph codecs
//!
//! Covers Native (bincode) and Compact (MessagePack), alone and under the
//! compression decorator, including nested and optional state.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args
)]

use persist_codec::{
    BaseCodec, BaseCodecKind, Codec, CodecKind, Compact, Compression, Encoding, Native,
    PersistError, Persistable, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf { class: u32, weight: f64 },
    Split { feature: usize, threshold: f64, left: Box<Node>, right: Box<Node> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Forest {
    trees: Vec<Node>,
    feature_names: BTreeMap<usize, String>,
    oob_score: Option<f64>,
}

impl Persistable for Forest {
    const CLASS_NAME: &'static str = "Forest";

    fn revision(&self) -> u32 {
        2
    }
}

fn forest() -> Forest {
    let tree = Node::Split {
        feature: 0,
        threshold: 0.5,
        left: Box::new(Node::Leaf { class: 0, weight: 0.9 }),
        right: Box::new(Node::Split {
            feature: 1,
            threshold: -2.0,
            left: Box::new(Node::Leaf { class: 1, weight: 0.7 }),
            right: Box::new(Node::Leaf { class: 0, weight: 0.6 }),
        }),
    };

    Forest {
        trees: vec![tree.clone(), tree],
        feature_names: [(0, "age".to_string()), (1, "income".to_string())]
            .into_iter()
            .collect(),
        oob_score: None,
    }
}

fn roundtrip<C: Codec>(codec: &C) {
    let encoding = codec.encode(&forest()).expect("Failed to encode");
    let recovered: Forest = codec.decode(&encoding).expect("Failed to decode");
    assert_eq!(recovered, forest());
}

#[test]
fn test_native_roundtrip() {
    roundtrip(&Native);
    assert_eq!(Native.kind(), CodecKind::Native);
}

#[test]
fn test_native_is_deterministic() {
    let first = Native.encode(&forest()).unwrap();
    let second = Native.encode(&forest()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_native_rejects_garbage() {
    let result: Result<Forest> = Native.decode(&Encoding::from(vec![0xFF; 7]));
    assert!(matches!(result, Err(PersistError::Format(_))));
}

#[test]
fn test_native_empty_encoding() {
    let result: Result<Forest> = Native.decode(&Encoding::default());
    assert!(result.is_err());
}

#[cfg(feature = "compact")]
#[test]
fn test_compact_roundtrip() {
    let codec = Compact::new().expect("compact feature enabled");
    roundtrip(&codec);
    assert_eq!(codec.kind(), CodecKind::Compact);
}

#[cfg(feature = "compact")]
#[test]
fn test_compact_is_denser_for_sparse_state() {
    // Small integers and short strings: fixed-width in bincode, packed in MessagePack
    let mut sparse = forest();
    sparse.trees.clear();
    sparse.feature_names = (0..64).map(|i| (i, format!("f{i}"))).collect();

    let native = Native.encode(&sparse).unwrap();
    let compact = Compact::new().unwrap().encode(&sparse).unwrap();
    assert!(
        compact.len() < native.len(),
        "compact {} >= native {}",
        compact.len(),
        native.len()
    );
}

#[cfg(feature = "compact")]
#[test]
fn test_codecs_are_not_cross_compatible() {
    let encoding = Native.encode(&forest()).unwrap();
    let result: Result<Forest> = Compact::new().unwrap().decode(&encoding);
    assert!(result.is_err());
}

#[cfg(not(feature = "compact"))]
#[test]
fn test_compact_unavailable() {
    assert!(!Compact::is_available());
    assert!(matches!(Compact::new(), Err(PersistError::Unavailable(_))));
    assert!(matches!(
        BaseCodec::from_kind(BaseCodecKind::Compact),
        Err(PersistError::Unavailable(_))
    ));
}

#[test]
fn test_base_codec_from_kind() {
    let native = BaseCodec::from_kind(BaseCodecKind::Native).unwrap();
    assert_eq!(native.kind(), CodecKind::Native);
    roundtrip(&native);

    if Compact::is_available() {
        let compact = BaseCodec::from_kind(BaseCodecKind::Compact).unwrap();
        assert_eq!(compact.kind(), CodecKind::Compact);
        roundtrip(&compact);
    }
}

#[test]
fn test_base_kind_parse() {
    assert_eq!("native".parse::<BaseCodecKind>().unwrap(), BaseCodecKind::Native);
    assert_eq!("COMPACT".parse::<BaseCodecKind>().unwrap(), BaseCodecKind::Compact);
    assert!("json".parse::<BaseCodecKind>().is_err());
}

#[test]
fn test_compressed_roundtrip_every_level() {
    for level in 0..=9 {
        let codec = Compression::new(BaseCodec::default(), level).unwrap();
        roundtrip(&codec);
        assert_eq!(codec.kind(), CodecKind::Compression);
    }
}

#[test]
fn test_compression_shrinks_repetitive_state() {
    let mut big = forest();
    big.trees = vec![big.trees[0].clone(); 500];

    let raw = Native.encode(&big).unwrap();
    let packed = Compression::new(Native, 9).unwrap().encode(&big).unwrap();
    assert!(packed.len() * 10 < raw.len());
}

#[test]
fn test_nested_compression_rejected() {
    let inner = Compression::new(Native, 6).unwrap();
    let result = Compression::new(inner, 6);
    assert!(matches!(result, Err(PersistError::Config(_))));
}

#[test]
fn test_compression_limit_enforced() {
    let mut big = forest();
    big.trees = vec![big.trees[0].clone(); 500];

    let writer = Compression::new(Native, 9).unwrap();
    let reader = Compression::new(Native, 9).unwrap().with_limit(1024);

    let encoding = writer.encode(&big).unwrap();
    let result: Result<Forest> = reader.decode(&encoding);
    assert!(matches!(result, Err(PersistError::Corruption(_))));
}
