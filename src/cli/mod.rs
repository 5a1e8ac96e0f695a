pub mod args;
mod audit;
mod profiles;
mod standardize;

pub use args::{
    AuditCliArgs, Cli, CliCommand, OverrideArgs, ProfilesCliArgs, ProfilesCommand,
    StandardizeCliArgs,
};
pub use audit::handle_audit_command;
pub use profiles::handle_profiles_command;
pub use standardize::handle_standardize_command;
