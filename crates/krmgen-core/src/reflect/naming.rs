//! Field name conversion from serialized names to Go field identifiers

use serde::{Deserialize, Serialize};

/// Initialisms Go spells in capitals
const GO_INITIALISMS: &[&str] = &[
    "acl", "api", "cidr", "cpu", "csi", "dns", "fs", "gid", "grpc", "http", "https", "id", "ip", "ipc",
    "json", "nfs", "os", "pid", "sctp", "se", "sha", "ssh", "tcp", "tls", "ttl", "tty", "udp", "uid",
    "uri", "url", "uuid", "vm", "xml",
];

/// How serialized field names become emitted field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldNaming {
    /// Keep the serialized name
    Preserve,
    /// Upper-case the first letter only
    UpperFirst,
    /// Upper camel case with Go initialisms (`apiVersion` -> `APIVersion`)
    #[default]
    GoExported,
}

impl FieldNaming {
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Preserve => name.to_string(),
            Self::UpperFirst => upper_first(name),
            Self::GoExported => go_exported(name),
        }
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split `clusterIPs` into `cluster`, `IPs`; `snake_case` splits on underscores
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn go_exported(name: &str) -> String {
    split_words(name)
        .into_iter()
        .map(|word| {
            let lower = word.to_lowercase();
            if GO_INITIALISMS.contains(&lower.as_str()) {
                return lower.to_uppercase();
            }
            // plural initialisms keep a lower-case s: IPs, CIDRs
            if let Some(stem) = lower.strip_suffix('s') {
                if GO_INITIALISMS.contains(&stem) && word.len() > 2 {
                    return format!("{}s", stem.to_uppercase());
                }
            }
            upper_first(&word)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_exported_plain() {
        let naming = FieldNaming::GoExported;
        assert_eq!(naming.apply("name"), "Name");
        assert_eq!(naming.apply("generation"), "Generation");
        assert_eq!(naming.apply("containerPort"), "ContainerPort");
    }

    #[test]
    fn test_go_exported_initialisms() {
        let naming = FieldNaming::GoExported;
        assert_eq!(naming.apply("apiVersion"), "APIVersion");
        assert_eq!(naming.apply("clusterIP"), "ClusterIP");
        assert_eq!(naming.apply("clusterIPs"), "ClusterIPs");
        assert_eq!(naming.apply("uid"), "UID");
        assert_eq!(naming.apply("podCIDRs"), "PodCIDRs");
        assert_eq!(naming.apply("runAsUser"), "RunAsUser");
        assert_eq!(naming.apply("seLinuxOptions"), "SELinuxOptions");
        assert_eq!(naming.apply("hostPID"), "HostPID");
        assert_eq!(naming.apply("grpc"), "GRPC");
        assert_eq!(naming.apply("downwardAPI"), "DownwardAPI");
    }

    #[test]
    fn test_go_exported_snake_case() {
        assert_eq!(FieldNaming::GoExported.apply("host_ip"), "HostIP");
        assert_eq!(FieldNaming::GoExported.apply("read_only"), "ReadOnly");
    }

    #[test]
    fn test_already_exported_names_are_stable() {
        assert_eq!(FieldNaming::GoExported.apply("Name"), "Name");
        assert_eq!(FieldNaming::GoExported.apply("ObjectMeta"), "ObjectMeta");
    }

    #[test]
    fn test_other_namings() {
        assert_eq!(FieldNaming::Preserve.apply("apiVersion"), "apiVersion");
        assert_eq!(FieldNaming::UpperFirst.apply("apiVersion"), "ApiVersion");
        assert_eq!(FieldNaming::UpperFirst.apply(""), "");
    }
}
