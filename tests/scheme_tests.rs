//! End-to-end tests for the v1beta1 scheme and codec
//!
//! Exercises registration, alias resolution, the round-trip law and the
//! runtime error classes against fixture payloads.

use std::sync::Arc;
use std::thread;

use api_scheme::api::build_scheme;
use api_scheme::api::v1beta1::{self, Minion, MinionList, ObjectMeta, Pod, ServerOp, ServerOpList, Status};
use api_scheme::{codec_for, Codec, KnownType, Scheme, SchemeError, TypeMeta};

fn codec() -> Codec {
    v1beta1::codec(&build_scheme().unwrap())
}

// =============================================================================
// Registry Properties
// =============================================================================

#[test]
fn test_kind_for_is_deterministic() {
    let scheme = build_scheme().unwrap();
    let first = scheme.kind_for_type::<Pod>("v1beta1").unwrap().to_string();
    for _ in 0..10 {
        assert_eq!(scheme.kind_for_type::<Pod>("v1beta1").unwrap(), first);
    }
    assert_eq!(first, "Pod");
}

#[test]
fn test_alias_resolves_to_type() {
    let scheme = build_scheme().unwrap();
    let known = scheme.type_for("v1beta1", "Node").unwrap();
    assert!(known.is::<Minion>());
    assert_eq!(known.default_kind(), "Minion");
    assert_eq!(scheme.kind_for_type::<Minion>("v1beta1").unwrap(), "Minion");
    assert_eq!(scheme.aliases_for::<MinionList>("v1beta1"), vec!["NodeList"]);
}

#[test]
fn test_lookups_fail_with_not_found() {
    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Widget;
    api_scheme::api_object!(Widget);

    let scheme = build_scheme().unwrap();
    assert!(matches!(
        scheme.type_for("v1beta1", "Widget"),
        Err(SchemeError::NotFound { .. })
    ));
    assert!(matches!(
        scheme.kind_for_type::<Widget>("v1beta1"),
        Err(SchemeError::NotFound { .. })
    ));
}

#[test]
fn test_conflicting_registration_surfaces() {
    mod legacy {
        #[derive(Debug, serde::Serialize, serde::Deserialize)]
        pub struct Pod {
            pub name: String,
        }
        api_scheme::api_object!(Pod);
    }

    let mut scheme = Scheme::new();
    v1beta1::add_to_scheme(&mut scheme).unwrap();
    let err = scheme
        .add_known_types("v1beta1", [KnownType::of::<legacy::Pod>()])
        .unwrap_err();
    assert!(err.is_registration_error());
    assert!(matches!(err, SchemeError::KindConflict { ref kind, .. } if kind == "Pod"));

    // the original binding is untouched
    assert!(scheme.type_for("v1beta1", "Pod").unwrap().is::<Pod>());
}

// =============================================================================
// Codec Tests
// =============================================================================

#[test]
fn test_decode_node_fixture_as_minion() {
    let codec = codec();
    let obj = codec.decode(include_bytes!("fixtures/node.json")).unwrap();
    let minion = obj.downcast_ref::<Minion>().expect("Node decodes to Minion");
    assert_eq!(minion.meta.id, "node-1");
    assert_eq!(minion.host_ip, "10.0.0.5");
    assert_eq!(minion.labels["zone"], "a");
}

#[test]
fn test_pod_fixture_round_trip() {
    let codec = codec();
    let pod: Pod = codec.decode_into(include_bytes!("fixtures/pod.json")).unwrap();
    assert_eq!(pod.current_state.pod_ip, "10.244.1.4");
    assert_eq!(pod.desired_state.manifest.containers[0].image, "nginx:1.7");

    let data = codec.encode(&pod).unwrap();
    assert_eq!(codec.decode_into::<Pod>(&data).unwrap(), pod);

    let reencoded: serde_json::Value = serde_json::from_slice(&data).unwrap();
    assert_eq!(reencoded["labels"]["app"], "web");
    assert_eq!(reencoded["apiVersion"], "v1beta1");
}

#[test]
fn test_alias_list_canonicalized_on_encode() {
    let codec = codec();
    let list: ServerOpList = codec
        .decode_into(include_bytes!("fixtures/operation_list.json"))
        .unwrap();
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[1], ServerOp { meta: ObjectMeta::named("op-2") });

    let data = codec.encode(&list).unwrap();
    assert_eq!(TypeMeta::peek(&data).unwrap(), TypeMeta::new("v1beta1", "ServerOpList"));
}

#[test]
fn test_version_mismatch_fixture() {
    let err = codec().decode(include_bytes!("fixtures/v1_pod.json")).unwrap_err();
    assert!(!err.is_registration_error());
    assert!(matches!(err, SchemeError::VersionMismatch { .. }));
}

#[test]
fn test_unknown_kind_fixture() {
    let err = codec().decode(include_bytes!("fixtures/unknown_kind.json")).unwrap_err();
    match err {
        SchemeError::UnregisteredKind { kind, suggestion, version } => {
            assert_eq!(kind, "Minon");
            assert_eq!(version, "v1beta1");
            assert_eq!(suggestion.as_deref(), Some("Minion"));
        }
        other => panic!("Expected UnregisteredKind, got {:?}", other),
    }
}

#[test]
fn test_codec_for_other_version_sees_nothing() {
    let scheme = build_scheme().unwrap();
    let codec = codec_for(&scheme, "v1").unwrap();
    let err = codec.encode(&Status::default()).unwrap_err();
    assert!(matches!(err, SchemeError::UnregisteredKind { .. }));
    assert!(matches!(codec_for(&scheme, "one"), Err(SchemeError::InvalidVersion(_))));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_shared_scheme_across_threads() {
    let scheme: Arc<Scheme> = build_scheme().unwrap();
    let codec = v1beta1::codec(&scheme);

    thread::scope(|s| {
        for i in 0..8 {
            let codec = codec.clone();
            let scheme = &scheme;
            s.spawn(move || {
                for j in 0..50 {
                    let minion = Minion {
                        meta: ObjectMeta::named(format!("node-{i}-{j}")),
                        host_ip: format!("10.0.{i}.{j}"),
                        ..Default::default()
                    };
                    let data = codec.encode(&minion).unwrap();
                    assert_eq!(codec.decode_into::<Minion>(&data).unwrap(), minion);
                    assert_eq!(scheme.kind_for_type::<Minion>("v1beta1").unwrap(), "Minion");
                }
            });
        }
    });
}

// =============================================================================
// Manifest
// =============================================================================

#[test]
fn test_manifest_is_stable_across_builds() {
    let a = build_scheme().unwrap().manifest();
    let b = build_scheme().unwrap().manifest();
    assert!(a.verify());
    assert_eq!(a.checksum, b.checksum);
    assert_eq!(a.stats.total_kinds, 31);
    assert_eq!(a.stats.aliases, 4);

    let v1beta1 = a.version("v1beta1").unwrap();
    let aliases: Vec<_> = v1beta1.aliases().map(|k| k.kind.as_str()).collect();
    assert_eq!(aliases, vec!["Node", "NodeList", "Operation", "OperationList"]);
}
