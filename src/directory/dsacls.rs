// file: src/directory/dsacls.rs
// version: 1.1.0
// guid: bacddfc9-ff2d-457e-89e6-ed6aa921b69d

//! ACE application through the platform `dsacls` tool
//!
//! `dsacls` owns the security descriptor editing; this module only decides
//! whether a change is needed, builds the arguments and interprets the result.

use super::acl::{AccessControlType, AceSpec, AceStatus, SecurityInheritance};
use super::applier::AceApplier;
use crate::error::DelegationError;
use crate::Result;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Captured output of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stderr, or stdout when stderr is empty
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Trait for running external programs
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`. A non-zero exit is not an error; failing to
    /// start the process is.
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Runs programs as local child processes
#[derive(Debug, Default)]
pub struct TokioCommandRunner;

#[async_trait::async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        debug!("Executing {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                DelegationError::process(
                    program.display().to_string(),
                    format!("Failed to execute command: {}", e),
                )
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// [`AceApplier`] backed by `dsacls`
pub struct DsaclsAceApplier<C: CommandRunner = TokioCommandRunner> {
    program: PathBuf,
    domain: Option<String>,
    runner: C,
}

impl DsaclsAceApplier<TokioCommandRunner> {
    /// Use the configured dsacls path, or find `dsacls` in PATH
    pub fn locate(configured: Option<&str>, domain: Option<String>) -> Result<Self> {
        let program = match configured {
            Some(path) => PathBuf::from(path),
            None => which::which("dsacls").map_err(|e| {
                DelegationError::process("dsacls", format!("dsacls not found in PATH: {}", e))
            })?,
        };
        info!("Using dsacls at {}", program.display());
        Ok(Self::with_runner(program, domain, TokioCommandRunner))
    }
}

impl<C: CommandRunner> DsaclsAceApplier<C> {
    pub fn with_runner(program: impl Into<PathBuf>, domain: Option<String>, runner: C) -> Self {
        Self {
            program: program.into(),
            domain,
            runner,
        }
    }

    /// Prefix bare group names with the NetBIOS domain, if one is configured
    pub fn qualify_identity(&self, identity: &str) -> String {
        match &self.domain {
            Some(domain) if !identity.contains('\\') && !identity.contains('@') => {
                format!("{}\\{}", domain, identity)
            }
            _ => identity.to_string(),
        }
    }

    /// The `DOMAIN\name` form dsacls prints for `identity` in ACL listings.
    ///
    /// `None` for UPNs, and for bare names when no domain is configured.
    pub fn listing_account(&self, identity: &str) -> Option<String> {
        if identity.contains('@') {
            return None;
        }
        if identity.contains('\\') {
            return Some(identity.to_string());
        }
        self.domain
            .as_ref()
            .map(|domain| format!("{}\\{}", domain, identity))
    }

    async fn current_grants(&self, spec: &AceSpec, account: &str) -> Result<GrantScope> {
        let output = self
            .runner
            .run(&self.program, &[spec.target_path.clone()])
            .await?;

        if !output.success() {
            return Err(DelegationError::directory(format!(
                "Failed to read ACL of {}: {}",
                spec.target_path,
                output.diagnostics()
            )));
        }

        Ok(scan_listing(&output.stdout, account, spec))
    }
}

#[async_trait::async_trait]
impl<C: CommandRunner> AceApplier for DsaclsAceApplier<C> {
    async fn apply_or_remove_ace(
        &self,
        spec: &AceSpec,
        identity: &str,
        remove: bool,
    ) -> Result<AceStatus> {
        if !spec.object_type.is_nil() {
            return Err(DelegationError::validation(format!(
                "dsacls cannot scope an ACE to object type {}",
                spec.object_type
            )));
        }

        let account = self.qualify_identity(identity);
        match self.listing_account(identity) {
            Some(listed) => {
                let grants = self.current_grants(spec, &listed).await?;
                let in_place = if remove {
                    !grants.any()
                } else {
                    grants.covers(spec.inheritance)
                };
                if in_place {
                    debug!(
                        "{} already {} {} on {}",
                        listed,
                        if remove { "lacks" } else { "holds" },
                        spec.rights.listing_label(),
                        spec.target_path
                    );
                    return Ok(AceStatus::AlreadyInPlace);
                }
            }
            None => debug!(
                "Cannot match {} against ACL listings, updating {} unconditionally",
                identity, spec.target_path
            ),
        }

        let args = mutation_args(spec, &account, remove);
        let output = self.runner.run(&self.program, &args).await?;

        if output.success() {
            debug!("Updated ACL of {}", spec.target_path);
            Ok(AceStatus::Changed)
        } else {
            warn!(
                "dsacls failed on {} with exit code {:?}: {}",
                spec.target_path,
                output.exit_code,
                output.diagnostics()
            );
            Ok(AceStatus::Failed)
        }
    }
}

/// Arguments that add (`/G` or `/D`) or remove (`/R`) the ACE for `account`
fn mutation_args(spec: &AceSpec, account: &str, remove: bool) -> Vec<String> {
    let mut args = vec![spec.target_path.clone()];

    if remove {
        args.push("/R".to_string());
        args.push(account.to_string());
        return args;
    }

    if let Some(flag) = spec.inheritance.dsacls_flag() {
        args.push(format!("/I:{}", flag));
    }
    args.push(match spec.access {
        AccessControlType::Allow => "/G".to_string(),
        AccessControlType::Deny => "/D".to_string(),
    });
    args.push(format!("{}:{}", account, spec.rights.dsacls_code()));
    args
}

/// Where explicit entries matching an ACE were found in a dsacls listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrantScope {
    /// Listed under "Access list:", applying to the object itself
    pub on_object: bool,
    /// Listed under "Inherited to all subobjects"
    pub on_all_subobjects: bool,
    /// Listed under an object-class specific "Inherited to <class>" heading
    pub on_some_subobjects: bool,
}

impl GrantScope {
    pub fn any(&self) -> bool {
        self.on_object || self.on_all_subobjects || self.on_some_subobjects
    }

    /// Whether the listed entries include an ACE with `inheritance`
    pub fn covers(&self, inheritance: SecurityInheritance) -> bool {
        match inheritance {
            SecurityInheritance::None => self.on_object,
            SecurityInheritance::All => self.on_object && self.on_all_subobjects,
            SecurityInheritance::Descendents | SecurityInheritance::Children => {
                self.on_all_subobjects
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Object,
    SubobjectsHeading,
    AllSubobjects,
    SomeSubobjects,
}

/// Explicit entries in a dsacls listing matching `spec` for `account`, by section
pub fn scan_listing(listing: &str, account: &str, spec: &AceSpec) -> GrantScope {
    let mut scope = GrantScope::default();
    let mut section = Section::Header;

    for line in listing.lines().map(str::trim) {
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("access list:") {
            section = Section::Object;
            continue;
        }
        if lower.starts_with("permissions inherited to subobjects") {
            section = Section::SubobjectsHeading;
            continue;
        }
        if lower.starts_with("inherited to all subobjects") {
            section = Section::AllSubobjects;
            continue;
        }
        if lower.starts_with("inherited to ") {
            section = Section::SomeSubobjects;
            continue;
        }

        if !entry_matches(line, account, spec) {
            continue;
        }
        match section {
            Section::Object => scope.on_object = true,
            Section::AllSubobjects => scope.on_all_subobjects = true,
            Section::SomeSubobjects => scope.on_some_subobjects = true,
            Section::Header | Section::SubobjectsHeading => {}
        }
    }

    scope
}

fn entry_matches(line: &str, account: &str, spec: &AceSpec) -> bool {
    if line.contains("<Inherited from parent>") {
        return false;
    }
    let access = spec.access.as_str();
    let Some(prefix) = line.get(..access.len()) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case(access) {
        return false;
    }
    let rest = &line[access.len()..];
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    match rest.to_ascii_uppercase().find(spec.rights.listing_label()) {
        Some(idx) => rest[..idx].trim().eq_ignore_ascii_case(account),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::acl::ActiveDirectoryRights;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const PATH: &str = "CN=Dfs-Configuration,CN=System,DC=example,DC=com";

    const LISTING_WITH_GRANT: &str = r#"Owner: EXAMPLE\Domain Admins
Group: EXAMPLE\Domain Admins

Access list:
Allow EXAMPLE\Domain Admins           FULL CONTROL
Allow EXAMPLE\SL_DfsRight             FULL CONTROL
Allow NT AUTHORITY\Authenticated Users
                                      SPECIAL ACCESS
Allow BUILTIN\Administrators          FULL CONTROL   <Inherited from parent>

Permissions inherited to subobjects are:
Inherited to all subobjects
Allow EXAMPLE\SL_DfsRight             FULL CONTROL
Inherited to user
Allow BUILTIN\Pre-Windows 2000 Compatible Access
                                      SPECIAL ACCESS   <Inherited from parent>

The command completed successfully
"#;

    const LISTING_WITHOUT_GRANT: &str = r#"Access list:
Allow EXAMPLE\Domain Admins           FULL CONTROL
Allow EXAMPLE\SL_DfsRight             SPECIAL ACCESS
Allow EXAMPLE\SL_Other                FULL CONTROL   <Inherited from parent>

The command completed successfully
"#;

    const LISTING_OBJECT_ONLY: &str = r#"Access list:
Allow EXAMPLE\Domain Admins           FULL CONTROL
Allow EXAMPLE\SL_DfsRight             FULL CONTROL

Permissions inherited to subobjects are:
Inherited to all subobjects
Allow EXAMPLE\Domain Admins           FULL CONTROL

The command completed successfully
"#;

    const LISTING_SUBOBJECTS_ONLY: &str = r#"Access list:
Allow EXAMPLE\Domain Admins           FULL CONTROL

Permissions inherited to subobjects are:
Inherited to all subobjects
Allow EXAMPLE\SL_DfsRight             FULL CONTROL

The command completed successfully
"#;

    const LISTING_CLASS_SCOPED: &str = r#"Access list:
Allow EXAMPLE\Domain Admins           FULL CONTROL

Permissions inherited to subobjects are:
Inherited to msDFSR-ReplicationGroup
Allow EXAMPLE\SL_DfsRight             FULL CONTROL

The command completed successfully
"#;

    struct ScriptedRunner {
        responses: Mutex<VecDeque<CommandOutput>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        fn new(responses: Vec<CommandOutput>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, _program: &Path, args: &[String]) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected dsacls call"))
        }
    }

    fn output(exit_code: i32, stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn completed() -> CommandOutput {
        output(0, "The command completed successfully")
    }

    fn spec() -> AceSpec {
        AceSpec::allow_all(PATH, ActiveDirectoryRights::GenericAll)
    }

    fn applier(runner: ScriptedRunner) -> DsaclsAceApplier<ScriptedRunner> {
        DsaclsAceApplier::with_runner("dsacls", Some("EXAMPLE".to_string()), runner)
    }

    fn applier_without_domain(runner: ScriptedRunner) -> DsaclsAceApplier<ScriptedRunner> {
        DsaclsAceApplier::with_runner("dsacls", None, runner)
    }

    #[test]
    fn test_scan_finds_inheritable_grant() {
        let scope = scan_listing(LISTING_WITH_GRANT, "example\\sl_dfsright", &spec());

        assert!(scope.on_object);
        assert!(scope.on_all_subobjects);
        assert!(!scope.on_some_subobjects);
        assert!(scope.covers(SecurityInheritance::All));
    }

    #[test]
    fn test_scan_ignores_inherited_and_partial_rights() {
        assert!(!scan_listing(LISTING_WITHOUT_GRANT, "EXAMPLE\\SL_DfsRight", &spec()).any());
        assert!(!scan_listing(LISTING_WITHOUT_GRANT, "EXAMPLE\\SL_Other", &spec()).any());
        assert!(!scan_listing(LISTING_WITH_GRANT, "BUILTIN\\Administrators", &spec()).any());
    }

    #[test]
    fn test_scan_requires_same_domain() {
        assert!(!scan_listing(LISTING_WITH_GRANT, "OTHER\\SL_DfsRight", &spec()).any());
        assert!(!scan_listing(LISTING_WITH_GRANT, "SL_DfsRight", &spec()).any());
    }

    #[test]
    fn test_object_only_grant_does_not_cover_inheritance() {
        let scope = scan_listing(LISTING_OBJECT_ONLY, "EXAMPLE\\SL_DfsRight", &spec());

        assert!(scope.covers(SecurityInheritance::None));
        assert!(!scope.covers(SecurityInheritance::All));
    }

    #[test]
    fn test_subobjects_only_grant_does_not_cover_object() {
        let scope = scan_listing(LISTING_SUBOBJECTS_ONLY, "EXAMPLE\\SL_DfsRight", &spec());

        assert!(scope.covers(SecurityInheritance::Descendents));
        assert!(!scope.covers(SecurityInheritance::All));
        assert!(!scope.covers(SecurityInheritance::None));
    }

    #[test]
    fn test_class_scoped_grant_counts_for_removal_only() {
        let scope = scan_listing(LISTING_CLASS_SCOPED, "EXAMPLE\\SL_DfsRight", &spec());

        assert!(scope.any());
        assert!(!scope.covers(SecurityInheritance::All));
        assert!(!scope.covers(SecurityInheritance::Descendents));
    }

    #[test]
    fn test_qualify_identity() {
        let applier = applier(ScriptedRunner::new(vec![]));
        assert_eq!(applier.qualify_identity("SL_DfsRight"), "EXAMPLE\\SL_DfsRight");
        assert_eq!(applier.qualify_identity("CORP\\SL_DfsRight"), "CORP\\SL_DfsRight");
        assert_eq!(
            applier.qualify_identity("sl_dfsright@example.com"),
            "sl_dfsright@example.com"
        );
    }

    #[test]
    fn test_listing_account() {
        let with_domain = applier(ScriptedRunner::new(vec![]));
        assert_eq!(
            with_domain.listing_account("SL_DfsRight").as_deref(),
            Some("EXAMPLE\\SL_DfsRight")
        );
        assert!(with_domain.listing_account("sl_dfsright@example.com").is_none());

        let without_domain = applier_without_domain(ScriptedRunner::new(vec![]));
        assert!(without_domain.listing_account("SL_DfsRight").is_none());
        assert_eq!(
            without_domain.listing_account("CORP\\SL_DfsRight").as_deref(),
            Some("CORP\\SL_DfsRight")
        );
    }

    #[test]
    fn test_mutation_args() {
        assert_eq!(
            mutation_args(&spec(), "EXAMPLE\\SL_DfsRight", false),
            vec![PATH, "/I:T", "/G", "EXAMPLE\\SL_DfsRight:GA"]
        );
        assert_eq!(
            mutation_args(&spec(), "EXAMPLE\\SL_DfsRight", true),
            vec![PATH, "/R", "EXAMPLE\\SL_DfsRight"]
        );
    }

    #[tokio::test]
    async fn test_grant_when_absent() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_WITHOUT_GRANT),
            completed(),
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        let calls = applier.runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], vec![PATH.to_string()]);
        assert_eq!(calls[1][2], "/G");
    }

    #[tokio::test]
    async fn test_grant_when_present_is_noop() {
        let applier = applier(ScriptedRunner::new(vec![output(0, LISTING_WITH_GRANT)]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::AlreadyInPlace);
        assert_eq!(applier.runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_grant_over_subobjects_only_entry() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_SUBOBJECTS_ONLY),
            completed(),
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        assert_eq!(applier.runner.calls()[1][1], "/I:T");
    }

    #[tokio::test]
    async fn test_grant_over_object_only_entry() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_OBJECT_ONLY),
            completed(),
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        assert_eq!(applier.runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_when_absent_is_noop() {
        let applier = applier(ScriptedRunner::new(vec![output(0, LISTING_WITHOUT_GRANT)]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::AlreadyInPlace);
    }

    #[tokio::test]
    async fn test_remove_when_present() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_WITH_GRANT),
            completed(),
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        assert_eq!(applier.runner.calls()[1][1], "/R");
    }

    #[tokio::test]
    async fn test_remove_subobjects_only_entry() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_SUBOBJECTS_ONLY),
            completed(),
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        assert_eq!(applier.runner.calls()[1][1], "/R");
    }

    #[tokio::test]
    async fn test_remove_by_upn_always_runs_dsacls() {
        let applier = applier(ScriptedRunner::new(vec![completed()]));

        let status = applier
            .apply_or_remove_ace(&spec(), "sl_dfsright@example.com", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        assert_eq!(
            applier.runner.calls(),
            vec![vec![
                PATH.to_string(),
                "/R".to_string(),
                "sl_dfsright@example.com".to_string()
            ]]
        );
    }

    #[tokio::test]
    async fn test_remove_by_upn_reports_failure() {
        let applier = applier(ScriptedRunner::new(vec![output(
            5,
            "No ACE was found for the specified trustee.",
        )]));

        let status = applier
            .apply_or_remove_ace(&spec(), "sl_dfsright@example.com", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Failed);
    }

    #[tokio::test]
    async fn test_bare_name_without_domain_skips_listing() {
        let applier = applier_without_domain(ScriptedRunner::new(vec![completed()]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", true)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Changed);
        let calls = applier.runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][1], "/R");
    }

    #[tokio::test]
    async fn test_failed_mutation_reports_failed() {
        let applier = applier(ScriptedRunner::new(vec![
            output(0, LISTING_WITHOUT_GRANT),
            CommandOutput {
                exit_code: Some(5),
                stdout: String::new(),
                stderr: "Access is denied.".to_string(),
            },
        ]));

        let status = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap();

        assert_eq!(status, AceStatus::Failed);
    }

    #[tokio::test]
    async fn test_unreadable_acl_is_an_error() {
        let applier = applier(ScriptedRunner::new(vec![output(
            2,
            "The specified directory service object was not found.",
        )]));

        let err = applier
            .apply_or_remove_ace(&spec(), "SL_DfsRight", false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to read ACL"));
        assert_eq!(applier.runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_object_type_is_rejected() {
        let applier = applier(ScriptedRunner::new(vec![]));
        let mut spec = spec();
        spec.object_type = uuid::Uuid::new_v4();

        let result = applier.apply_or_remove_ace(&spec, "SL_DfsRight", false).await;

        assert!(result.is_err());
        assert!(applier.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_process_error() {
        let runner = TokioCommandRunner;
        let result = runner
            .run(Path::new("/nonexistent/dsacls"), &[PATH.to_string()])
            .await;

        assert!(matches!(result, Err(DelegationError::Process { .. })));
    }
}
