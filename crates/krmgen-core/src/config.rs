//! Generator configuration
//!
//! Loaded from YAML; every field has a default.
//!
//! ```yaml
//! package: controller
//! namespace: prod
//! reflect:
//!   naming: go-exported
//!   rules:
//!     - field: Labels
//!       action:
//!         strip-keys: [helm.sh/chart]
//! codegen:
//!   quoted-key-types: [ResourceList]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::emit::CodegenConfig;
use crate::error::ConfigError;
use crate::reflect::{FieldAction, FieldRule, FieldScope, ReflectOptions};
use crate::types::TypeRef;

/// Scalar fields the Kubernetes Go API declares as pointers
const K8S_POINTER_FIELDS: &[&str] = &[
    "Replicas",
    "RevisionHistoryLimit",
    "ProgressDeadlineSeconds",
    "TerminationGracePeriodSeconds",
    "ActiveDeadlineSeconds",
    "AutomountServiceAccountToken",
    "ShareProcessNamespace",
    "EnableServiceLinks",
    "SetHostnameAsFQDN",
    "HostUsers",
    "Priority",
    "RuntimeClassName",
    "RunAsUser",
    "RunAsGroup",
    "RunAsNonRoot",
    "ReadOnlyRootFilesystem",
    "AllowPrivilegeEscalation",
    "Privileged",
    "FSGroup",
    "DefaultMode",
    "Optional",
    "Immutable",
    "StorageClassName",
    "Partition",
    "AllocateLoadBalancerNodePorts",
    "ExpirationSeconds",
];

/// Struct and string fields the Go API declares as pointers, by declaring struct
///
/// Declaring structs are named as `k8s-openapi` serializes them, which
/// flattens Go's embedded `ProbeHandler` and `VolumeSource` into their parents.
const K8S_SCOPED_POINTER_FIELDS: &[(&str, &[&str])] = &[
    ("ObjectMeta", &["DeletionTimestamp", "DeletionGracePeriodSeconds"]),
    ("OwnerReference", &["Controller", "BlockOwnerDeletion"]),
    ("DeploymentSpec", &["Selector"]),
    ("DeploymentStrategy", &["RollingUpdate"]),
    ("StatefulSetSpec", &["Selector", "PersistentVolumeClaimRetentionPolicy", "Ordinals"]),
    ("StatefulSetUpdateStrategy", &["RollingUpdate"]),
    ("PodSpec", &["SecurityContext", "Affinity", "DNSConfig", "OS"]),
    (
        "Container",
        &["LivenessProbe", "ReadinessProbe", "StartupProbe", "Lifecycle", "SecurityContext"],
    ),
    ("Probe", PROBE_HANDLERS),
    ("Lifecycle", &["PostStart", "PreStop"]),
    ("LifecycleHandler", &["Exec", "HTTPGet", "TCPSocket", "Sleep"]),
    ("GRPCAction", &["Service"]),
    ("EnvVar", &["ValueFrom"]),
    (
        "EnvVarSource",
        &["FieldRef", "ResourceFieldRef", "ConfigMapKeyRef", "SecretKeyRef"],
    ),
    ("EnvFromSource", &["ConfigMapRef", "SecretRef"]),
    ("Volume", VOLUME_SOURCES),
    ("VolumeProjection", &["Secret", "DownwardAPI", "ConfigMap", "ServiceAccountToken"]),
    ("EmptyDirVolumeSource", &["SizeLimit"]),
    ("KeyToPath", &["Mode"]),
    ("DownwardAPIVolumeFile", &["Mode", "FieldRef", "ResourceFieldRef"]),
    (
        "PodSecurityContext",
        &["SELinuxOptions", "WindowsOptions", "SeccompProfile", "AppArmorProfile"],
    ),
    (
        "SecurityContext",
        &["Capabilities", "SELinuxOptions", "WindowsOptions", "SeccompProfile", "AppArmorProfile"],
    ),
    ("SeccompProfile", &["LocalhostProfile"]),
    ("AppArmorProfile", &["LocalhostProfile"]),
    ("Affinity", &["NodeAffinity", "PodAffinity", "PodAntiAffinity"]),
    ("NodeAffinity", &["RequiredDuringSchedulingIgnoredDuringExecution"]),
    ("PodAffinityTerm", &["LabelSelector", "NamespaceSelector"]),
    ("TopologySpreadConstraint", &["LabelSelector", "MinDomains"]),
    ("Toleration", &["TolerationSeconds"]),
    ("PodDNSConfigOption", &["Value"]),
    ("ServiceSpec", &["SessionAffinityConfig", "LoadBalancerClass", "TrafficDistribution"]),
    ("SessionAffinityConfig", &["ClientIP"]),
    ("ClientIPConfig", &["TimeoutSeconds"]),
    ("ServicePort", &["AppProtocol"]),
    (
        "PersistentVolumeClaimSpec",
        &["Selector", "DataSource", "DataSourceRef", "VolumeAttributesClassName"],
    ),
    ("TypedLocalObjectReference", &["APIGroup"]),
    ("TypedObjectReference", &["APIGroup", "Namespace"]),
    ("ClusterRole", &["AggregationRule"]),
];

const PROBE_HANDLERS: &[&str] = &["Exec", "HTTPGet", "TCPSocket", "GRPC"];

const VOLUME_SOURCES: &[&str] = &[
    "HostPath",
    "EmptyDir",
    "Secret",
    "NFS",
    "PersistentVolumeClaim",
    "DownwardAPI",
    "ConfigMap",
    "Projected",
    "CSI",
    "Ephemeral",
    "Image",
];

/// Fields Go reaches through an embedded member: (declaring struct, member, fields)
const K8S_EMBEDDED_FIELDS: &[(&str, &str, &[&str])] = &[
    ("Probe", "ProbeHandler", PROBE_HANDLERS),
    ("Volume", "VolumeSource", VOLUME_SOURCES),
    ("ConfigMapKeySelector", "LocalObjectReference", &["Name"]),
    ("SecretKeySelector", "LocalObjectReference", &["Name"]),
    ("ConfigMapEnvSource", "LocalObjectReference", &["Name"]),
    ("SecretEnvSource", "LocalObjectReference", &["Name"]),
    ("ConfigMapVolumeSource", "LocalObjectReference", &["Name"]),
    ("ConfigMapProjection", "LocalObjectReference", &["Name"]),
    ("SecretProjection", "LocalObjectReference", &["Name"]),
];

/// Pointers to string enums: (declaring struct, field, enum type)
const K8S_ENUM_POINTER_FIELDS: &[(&str, &str, &str)] = &[
    ("PersistentVolumeClaimSpec", "VolumeMode", "PersistentVolumeMode"),
    ("ServiceSpec", "IPFamilyPolicy", "IPFamilyPolicy"),
    ("ServiceSpec", "InternalTrafficPolicy", "ServiceInternalTrafficPolicy"),
    ("PodSpec", "PreemptionPolicy", "PreemptionPolicy"),
    ("PriorityClass", "PreemptionPolicy", "PreemptionPolicy"),
    ("PodSecurityContext", "FSGroupChangePolicy", "PodFSGroupChangePolicy"),
    ("SecurityContext", "ProcMount", "ProcMountType"),
    ("VolumeMount", "MountPropagation", "MountPropagationMode"),
    ("HostPathVolumeSource", "Type", "HostPathType"),
    ("TopologySpreadConstraint", "NodeAffinityPolicy", "NodeInclusionPolicy"),
    ("TopologySpreadConstraint", "NodeTaintsPolicy", "NodeInclusionPolicy"),
    ("Container", "RestartPolicy", "ContainerRestartPolicy"),
];

/// Int-or-string fields: (field, declaring struct, pointer in Go)
const K8S_INT_OR_STRING_FIELDS: &[(&str, &str, bool)] = &[
    ("TargetPort", "ServicePort", false),
    ("Port", "HTTPGetAction", false),
    ("Port", "TCPSocketAction", false),
    ("MaxSurge", "RollingUpdateDeployment", true),
    ("MaxUnavailable", "RollingUpdateDeployment", true),
    ("MaxUnavailable", "RollingUpdateStatefulSetStrategy", true),
];

fn default_package() -> String {
    "controller".to_string()
}

/// Settings for one generator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Go package clause of the generated file
    pub package: String,

    /// Namespace backfilled by the generated batch helpers
    pub namespace: String,

    pub reflect: ReflectOptions,

    pub codegen: CodegenConfig,

    /// Module mapping table; built-in table when unset
    pub struct_mapping: Option<PathBuf>,

    /// Enum set table; built-in table when unset
    pub enum_mapping: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            namespace: String::new(),
            reflect: ReflectOptions::default(),
            codegen: CodegenConfig::default(),
            struct_mapping: None,
            enum_mapping: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Preset for objects decoded with `k8s-openapi`
    ///
    /// `Option` there means "may be absent" rather than a Go pointer, so
    /// pointer-ness comes from the field lists instead.
    pub fn kubernetes() -> Self {
        let mut rules = vec![
            FieldRule::strip_tool_labels(),
            FieldRule::new("APIVersion", FieldAction::Drop).in_scope(FieldScope::Root),
            FieldRule::new("Kind", FieldAction::Drop).in_scope(FieldScope::Root),
            FieldRule::new("APIVersion", FieldAction::Drop)
                .in_scope(FieldScope::Within("PersistentVolumeClaim".to_string())),
            FieldRule::new("Kind", FieldAction::Drop)
                .in_scope(FieldScope::Within("PersistentVolumeClaim".to_string())),
            FieldRule::new("Metadata", FieldAction::Rename("ObjectMeta".to_string())),
            FieldRule::new("Limits", FieldAction::Retype(TypeRef::named("ResourceList"))),
            FieldRule::new("Requests", FieldAction::Retype(TypeRef::named("ResourceList"))),
            FieldRule::new("Overhead", FieldAction::Retype(TypeRef::named("ResourceList")))
                .in_scope(FieldScope::Within("PodSpec".to_string())),
            FieldRule::new("IPFamilies", FieldAction::Retype(TypeRef::named("IPFamily").slice_of()))
                .in_scope(FieldScope::Within("ServiceSpec".to_string())),
            FieldRule::new("Data", FieldAction::Retype(TypeRef::Bytes.map_of()))
                .in_scope(FieldScope::Within("Secret".to_string())),
            FieldRule::new("BinaryData", FieldAction::Retype(TypeRef::Bytes.map_of()))
                .in_scope(FieldScope::Within("ConfigMap".to_string())),
            FieldRule::new(
                "AccessModes",
                FieldAction::Retype(TypeRef::named("PersistentVolumeAccessMode").slice_of()),
            ),
            FieldRule::new("Add", FieldAction::Retype(TypeRef::named("Capability").slice_of()))
                .in_scope(FieldScope::Within("Capabilities".to_string())),
            FieldRule::new("Drop", FieldAction::Retype(TypeRef::named("Capability").slice_of()))
                .in_scope(FieldScope::Within("Capabilities".to_string())),
        ];

        for (field, parent, pointer) in K8S_INT_OR_STRING_FIELDS {
            let scope = FieldScope::Within(parent.to_string());
            rules.push(FieldRule::new(*field, FieldAction::IntOrString).in_scope(scope.clone()));
            if *pointer {
                rules.push(FieldRule::new(*field, FieldAction::Pointer).in_scope(scope));
            }
        }
        rules.extend(
            K8S_POINTER_FIELDS
                .iter()
                .map(|field| FieldRule::new(*field, FieldAction::Pointer)),
        );
        for (parent, fields) in K8S_SCOPED_POINTER_FIELDS {
            rules.extend(fields.iter().map(|field| {
                FieldRule::new(*field, FieldAction::Pointer).in_scope(FieldScope::Within(parent.to_string()))
            }));
        }
        for (parent, field, enum_type) in K8S_ENUM_POINTER_FIELDS {
            rules.push(
                FieldRule::new(*field, FieldAction::Retype(TypeRef::named(*enum_type).pointer()))
                    .in_scope(FieldScope::Within(parent.to_string())),
            );
        }
        for (parent, member, fields) in K8S_EMBEDDED_FIELDS {
            rules.extend(fields.iter().map(|field| {
                FieldRule::new(*field, FieldAction::Embed(member.to_string()))
                    .in_scope(FieldScope::Within(parent.to_string()))
            }));
        }

        Self {
            reflect: ReflectOptions {
                option_as_pointer: false,
                rules,
                ..ReflectOptions::default()
            },
            ..Self::default()
        }
    }
}
