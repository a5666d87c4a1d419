//! Kind dispatch: decode a manifest into its typed Kubernetes object

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Secret, Service, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use k8s_openapi::api::scheduling::v1::PriorityClass;
use krmgen_core::{ConvertedResource, Pipeline, check_api_version};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::discovery::Manifest;
use crate::error::ResourceError;

/// Kinds decoded into typed objects
pub const SUPPORTED_KINDS: &[&str] = &[
    "Deployment",
    "Service",
    "Secret",
    "Role",
    "RoleBinding",
    "ClusterRole",
    "ClusterRoleBinding",
    "PersistentVolumeClaim",
    "StatefulSet",
    "ServiceAccount",
    "PriorityClass",
    "ConfigMap",
];

/// How documents are decoded before reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Into the `k8s-openapi` type of the kind
    Typed,
    /// Into a JSON value, emitted as `unstructured.Unstructured`
    Generic,
}

/// Convert one manifest document
pub fn convert(
    pipeline: &Pipeline<'_>,
    manifest: &Manifest,
    mode: DecodeMode,
) -> Result<ConvertedResource, ResourceError> {
    let kind = manifest.kind().ok_or_else(|| ResourceError::MissingField {
        path: manifest.source.clone(),
        field: "kind",
    })?;
    let api_version = manifest.api_version().ok_or_else(|| ResourceError::MissingField {
        path: manifest.source.clone(),
        field: "apiVersion",
    })?;
    check_api_version(api_version).map_err(|source| ResourceError::Convert {
        path: manifest.source.clone(),
        source,
    })?;

    if mode == DecodeMode::Generic {
        return Ok(pipeline.convert_unstructured(kind, &manifest.object));
    }

    match kind {
        "Deployment" => convert_as::<Deployment>(pipeline, manifest, api_version, kind),
        "Service" => convert_as::<Service>(pipeline, manifest, api_version, kind),
        "Secret" => convert_as::<Secret>(pipeline, manifest, api_version, kind),
        "Role" => convert_as::<Role>(pipeline, manifest, api_version, kind),
        "RoleBinding" => convert_as::<RoleBinding>(pipeline, manifest, api_version, kind),
        "ClusterRole" => convert_as::<ClusterRole>(pipeline, manifest, api_version, kind),
        "ClusterRoleBinding" => convert_as::<ClusterRoleBinding>(pipeline, manifest, api_version, kind),
        "PersistentVolumeClaim" => convert_as::<PersistentVolumeClaim>(pipeline, manifest, api_version, kind),
        "StatefulSet" => convert_as::<StatefulSet>(pipeline, manifest, api_version, kind),
        "ServiceAccount" => convert_as::<ServiceAccount>(pipeline, manifest, api_version, kind),
        "PriorityClass" => convert_as::<PriorityClass>(pipeline, manifest, api_version, kind),
        "ConfigMap" => convert_as::<ConfigMap>(pipeline, manifest, api_version, kind),
        other => Err(ResourceError::UnsupportedKind {
            path: manifest.source.clone(),
            kind: other.to_string(),
        }),
    }
}

fn convert_as<T>(
    pipeline: &Pipeline<'_>,
    manifest: &Manifest,
    api_version: &str,
    kind: &str,
) -> Result<ConvertedResource, ResourceError>
where
    T: DeserializeOwned + Serialize,
{
    let typed: T = serde_json::from_value(manifest.object.clone()).map_err(|e| ResourceError::Decode {
        path: manifest.source.clone(),
        message: e.to_string(),
    })?;
    pipeline
        .convert(api_version, kind, &typed)
        .map_err(|source| ResourceError::Convert {
            path: manifest.source.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use krmgen_core::{GeneratorConfig, KrmError, TypeTables, check_braces, normalize_whitespace};
    use serde_json::json;

    fn manifest(object: serde_json::Value) -> Manifest {
        Manifest {
            source: "test.yaml".into(),
            object,
        }
    }

    fn run(object: serde_json::Value, mode: DecodeMode) -> Result<ConvertedResource, ResourceError> {
        let config = GeneratorConfig::kubernetes();
        let tables = TypeTables::builtin().unwrap();
        let pipeline = Pipeline::new(&config, &tables);
        convert(&pipeline, &manifest(object), mode)
    }

    #[test]
    fn test_typed_config_map() {
        let converted = run(
            json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": {"name": "settings"},
                "data": {"level": "debug"}
            }),
            DecodeMode::Typed,
        )
        .unwrap();
        insta::assert_snapshot!(
            normalize_whitespace(&converted.literal),
            @r#"&corev1.ConfigMap{ Data : map[string]string{ "level" : "debug", }, ObjectMeta : metav1.ObjectMeta{ Name : "settings", }, }"#
        );
    }

    #[test]
    fn test_typed_service_account() {
        let converted = run(
            json!({
                "apiVersion": "v1",
                "kind": "ServiceAccount",
                "metadata": {"name": "builder", "namespace": "ci"},
                "automountServiceAccountToken": false
            }),
            DecodeMode::Typed,
        )
        .unwrap();
        insta::assert_snapshot!(
            normalize_whitespace(&converted.literal),
            @r#"&corev1.ServiceAccount{ AutomountServiceAccountToken : wrapBool(false), ObjectMeta : metav1.ObjectMeta{ Name : "builder", Namespace : "ci", }, }"#
        );
    }

    fn typed(object: serde_json::Value) -> String {
        let converted = run(object, DecodeMode::Typed).unwrap();
        assert!(check_braces(&converted.literal).is_ok());
        normalize_whitespace(&converted.literal)
    }

    #[test]
    fn test_typed_deployment_pointer_fields() {
        let go = typed(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {
                "replicas": 2,
                "selector": {"matchLabels": {"app": "web"}},
                "strategy": {
                    "type": "RollingUpdate",
                    "rollingUpdate": {"maxSurge": 1, "maxUnavailable": "25%"}
                },
                "template": {
                    "metadata": {"labels": {"app": "web"}},
                    "spec": {
                        "securityContext": {"runAsNonRoot": true},
                        "containers": [{
                            "name": "web",
                            "image": "nginx",
                            "ports": [{"containerPort": 8080}],
                            "livenessProbe": {
                                "httpGet": {"path": "/healthz", "port": 8080},
                                "periodSeconds": 10
                            },
                            "resources": {"limits": {"cpu": "500m"}}
                        }],
                        "volumes": [{"name": "config", "configMap": {"name": "web-config"}}]
                    }
                }
            }
        }));

        assert!(go.starts_with("&appsv1.Deployment{ ObjectMeta : metav1.ObjectMeta{ Name : \"web\", }, "));
        assert!(go.contains("Replicas : wrapInt32(2),"));
        assert!(go.contains(r#"Selector : &metav1.LabelSelector{ MatchLabels : map[string]string{ "app" : "web", }, },"#));
        assert!(go.contains("Strategy : appsv1.DeploymentStrategy{ RollingUpdate : &appsv1.RollingUpdateDeployment{"));
        assert!(go.contains("MaxSurge : &intstr.IntOrString{ IntVal : 1, },"));
        assert!(go.contains(r#"MaxUnavailable : &intstr.IntOrString{ Type : intstr.Type(1), StrVal : "25%", },"#));
        assert!(go.contains("SecurityContext : &corev1.PodSecurityContext{ RunAsNonRoot : wrapBool(true), },"));
        assert!(go.contains(
            r#"LivenessProbe : &corev1.Probe{ ProbeHandler : corev1.ProbeHandler{ HTTPGet : &corev1.HTTPGetAction{ Path : "/healthz", Port : intstr.IntOrString{ IntVal : 8080, }, }, }, PeriodSeconds : 10, },"#
        ));
        assert!(go.contains(r#"Limits : corev1.ResourceList{ "cpu" : resource.MustParse("500m"), },"#));
        assert!(go.contains(
            r#"corev1.Volume{ VolumeSource : corev1.VolumeSource{ ConfigMap : &corev1.ConfigMapVolumeSource{ LocalObjectReference : corev1.LocalObjectReference{ Name : "web-config", }, }, }, Name : "config", }"#
        ));
    }

    #[test]
    fn test_typed_stateful_set() {
        let go = typed(json!({
            "apiVersion": "apps/v1",
            "kind": "StatefulSet",
            "metadata": {"name": "db"},
            "spec": {
                "serviceName": "db",
                "replicas": 1,
                "selector": {"matchLabels": {"app": "db"}},
                "updateStrategy": {"type": "RollingUpdate", "rollingUpdate": {"maxUnavailable": 1}},
                "template": {
                    "metadata": {"labels": {"app": "db"}},
                    "spec": {
                        "containers": [{
                            "name": "db",
                            "image": "postgres",
                            "volumeMounts": [{"name": "data", "mountPath": "/var/lib/postgresql"}]
                        }]
                    }
                },
                "volumeClaimTemplates": [{
                    "metadata": {"name": "data"},
                    "spec": {
                        "accessModes": ["ReadWriteOnce"],
                        "resources": {"requests": {"storage": "1Gi"}}
                    }
                }]
            }
        }));

        assert!(go.starts_with("&appsv1.StatefulSet{"));
        assert!(go.contains(r#"Selector : &metav1.LabelSelector{ MatchLabels : map[string]string{ "app" : "db", }, },"#));
        assert!(go.contains(
            "UpdateStrategy : appsv1.StatefulSetUpdateStrategy{ RollingUpdate : &appsv1.RollingUpdateStatefulSetStrategy{ MaxUnavailable : &intstr.IntOrString{ IntVal : 1, }, },"
        ));
        assert!(go.contains(r#"corev1.VolumeMount{ MountPath : "/var/lib/postgresql", Name : "data", }"#));
        assert!(go.contains(
            r#"VolumeClaimTemplates : []corev1.PersistentVolumeClaim{ corev1.PersistentVolumeClaim{ ObjectMeta : metav1.ObjectMeta{ Name : "data", }, Spec : corev1.PersistentVolumeClaimSpec{ AccessModes : []corev1.PersistentVolumeAccessMode{ corev1.PersistentVolumeAccessMode("ReadWriteOnce"), }, Resources : corev1.VolumeResourceRequirements{ Requests : corev1.ResourceList{ "storage" : resource.MustParse("1Gi"), }, }, }, }, },"#
        ));
        assert!(!go.contains("APIVersion"));
    }

    #[test]
    fn test_typed_persistent_volume_claim() {
        let go = typed(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": {"name": "data"},
            "spec": {
                "accessModes": ["ReadWriteOnce"],
                "volumeMode": "Filesystem",
                "storageClassName": "fast",
                "resources": {"requests": {"storage": "5Gi"}}
            }
        }));
        insta::assert_snapshot!(
            go,
            @r#"&corev1.PersistentVolumeClaim{ ObjectMeta : metav1.ObjectMeta{ Name : "data", }, Spec : corev1.PersistentVolumeClaimSpec{ AccessModes : []corev1.PersistentVolumeAccessMode{ corev1.PersistentVolumeAccessMode("ReadWriteOnce"), }, Resources : corev1.VolumeResourceRequirements{ Requests : corev1.ResourceList{ "storage" : resource.MustParse("5Gi"), }, }, StorageClassName : wrapString("fast"), VolumeMode : wrapValue(corev1.PersistentVolumeMode("Filesystem")), }, }"#
        );
    }

    #[test]
    fn test_typed_priority_class() {
        let go = typed(json!({
            "apiVersion": "scheduling.k8s.io/v1",
            "kind": "PriorityClass",
            "metadata": {"name": "high"},
            "value": 1000000,
            "globalDefault": false,
            "preemptionPolicy": "Never",
            "description": "Critical"
        }));
        insta::assert_snapshot!(
            go,
            @r#"&schedulingv1.PriorityClass{ Description : "Critical", GlobalDefault : false, ObjectMeta : metav1.ObjectMeta{ Name : "high", }, PreemptionPolicy : wrapValue(corev1.PreemptionPolicy("Never")), Value : 1000000, }"#
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let err = run(
            json!({"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "p"}}),
            DecodeMode::Typed,
        )
        .unwrap_err();
        assert!(matches!(err, ResourceError::UnsupportedKind { ref kind, .. } if kind == "Pod"));
    }

    #[test]
    fn test_unsupported_version() {
        let err = run(
            json!({"apiVersion": "batch/v1beta1", "kind": "CronJob"}),
            DecodeMode::Generic,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Convert {
                source: KrmError::UnsupportedVersion { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_missing_kind() {
        let err = run(json!({"apiVersion": "v1"}), DecodeMode::Typed).unwrap_err();
        assert!(matches!(err, ResourceError::MissingField { field: "kind", .. }));
    }

    #[test]
    fn test_decode_error() {
        let err = run(
            json!({"apiVersion": "v1", "kind": "ConfigMap", "data": ["not", "a", "map"]}),
            DecodeMode::Typed,
        )
        .unwrap_err();
        assert!(matches!(err, ResourceError::Decode { .. }));
    }

    #[test]
    fn test_generic_mode() {
        let converted = run(
            json!({"apiVersion": "example.com/v1", "kind": "Widget", "spec": {"size": 3}}),
            DecodeMode::Generic,
        )
        .unwrap();
        assert_eq!(converted.kind, "Widget");
        assert!(converted.literal.starts_with("&unstructured.Unstructured{"));
    }
}
