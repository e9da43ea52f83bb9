// file: src/directory/mod.rs
// version: 1.0.0
// guid: bc8f1edf-4fbc-4121-a39a-cc8245c0ac07

//! Directory collaborators: naming context lookup and ACE application

pub mod acl;
pub mod applier;
pub mod dsacls;
pub mod naming;

pub use acl::{AccessControlType, AceSpec, AceStatus, ActiveDirectoryRights, SecurityInheritance};
pub use applier::{AceApplier, DryRunAceApplier};
pub use dsacls::{CommandOutput, CommandRunner, DsaclsAceApplier, TokioCommandRunner};
pub use naming::{LdapNamingContextResolver, NamingContextResolver, StaticNamingContext};
