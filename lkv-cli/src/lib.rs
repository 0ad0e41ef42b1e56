//! Shared pieces of the `lkctl` and `lkverify` command-line tools.
//!
//! Argument definitions, key resolution and report formatting live here so
//! both binaries stay thin and the behavior can be tested without spawning
//! processes.

pub mod args;
mod keys;
mod logging;
mod report;

pub use args::{
    Command, GenArgs, InfoKind, KeyArgs, LkctlArgs, LkverifyArgs, DEFAULT_KEYS_DIR, KEYS_DIR_ENV,
};
pub use keys::{load_or_generate_issuer_keys, IssuerKeySource};
pub use logging::{init_logging, log_level};
pub use report::{IssueReport, MachineReport, VerificationReport, TIME_FORMAT};
