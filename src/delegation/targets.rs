// file: src/delegation/targets.rs
// version: 1.0.0
// guid: 7a3d2992-dd2f-4e04-b9cb-2dbe82ea551b

//! DFS objects that receive the delegation ACEs

use crate::directory::{AceSpec, ActiveDirectoryRights};

/// Placeholder replaced by the domain naming context
pub const NAMING_CONTEXT_PLACEHOLDER: &str = "{naming_context}";

/// One delegated object: a DN template relative to the naming context and the rights granted on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AceTarget {
    pub path_template: &'static str,
    pub rights: ActiveDirectoryRights,
}

/// Objects delegated by the tool, in the order they are processed
pub const DFS_DELEGATION_TARGETS: &[AceTarget] = &[
    AceTarget {
        path_template: "CN=DFSR-GlobalSettings,CN=System,{naming_context}",
        rights: ActiveDirectoryRights::GenericAll,
    },
    AceTarget {
        path_template: "CN=Dfs-Configuration,CN=System,{naming_context}",
        rights: ActiveDirectoryRights::GenericAll,
    },
];

impl AceTarget {
    pub fn path(&self, naming_context: &str) -> String {
        self.path_template
            .replace(NAMING_CONTEXT_PLACEHOLDER, naming_context)
    }

    pub fn ace_spec(&self, naming_context: &str) -> AceSpec {
        AceSpec::allow_all(self.path(naming_context), self.rights)
    }
}

/// ACE specs for every delegated object under `naming_context`
pub fn build_ace_specs(naming_context: &str) -> Vec<AceSpec> {
    DFS_DELEGATION_TARGETS
        .iter()
        .map(|target| target.ace_spec(naming_context))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{AccessControlType, SecurityInheritance};

    #[test]
    fn test_paths_for_example_domain() {
        let specs = build_ace_specs("DC=example,DC=com");
        let paths: Vec<&str> = specs.iter().map(|s| s.target_path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "CN=DFSR-GlobalSettings,CN=System,DC=example,DC=com",
                "CN=Dfs-Configuration,CN=System,DC=example,DC=com",
            ]
        );
    }

    #[test]
    fn test_specs_grant_inheritable_full_control() {
        for spec in build_ace_specs("DC=corp,DC=local") {
            assert_eq!(spec.rights, ActiveDirectoryRights::GenericAll);
            assert_eq!(spec.access, AccessControlType::Allow);
            assert!(spec.object_type.is_nil());
            assert_eq!(spec.inheritance, SecurityInheritance::All);
        }
    }

    #[test]
    fn test_every_template_has_placeholder() {
        assert!(DFS_DELEGATION_TARGETS
            .iter()
            .all(|t| t.path_template.ends_with(NAMING_CONTEXT_PLACEHOLDER)));
    }
}
