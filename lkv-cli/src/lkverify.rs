//! lkverify: standalone license verifier.
//!
//! Usage:
//!   lkverify license.lic
//!   lkverify license.lic --json
//!   lkverify license.lic --public-key public.pem --aes-key aes.key
//!
//! Exits 0 for a valid license, 1 for an invalid license or any other
//! failure, and 2 for argument errors.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lkv_cli::{init_logging, log_level, LkverifyArgs, VerificationReport};
use lkv_license::{verify_file, SystemFingerprint, VerificationResult};

fn main() -> ExitCode {
    let args = LkverifyArgs::parse();
    init_logging(log_level(args.verbose, args.quiet));

    match run(&args) {
        Ok(result) if result.valid => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            if !args.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &LkverifyArgs) -> Result<VerificationResult> {
    let keys = args.keys.load()?;
    let result = verify_file(&args.license, &keys, &SystemFingerprint)
        .with_context(|| format!("failed to read license {}", args.license.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !args.quiet {
        print!("{}", VerificationReport(&result));
    }
    Ok(result)
}
