//! lkctl: license key control tool.
//!
//! Usage:
//!   lkctl get all
//!   lkctl keys --output keys
//!   lkctl gen --customer "Acme" --features export,sync --duration 30 license.lic
//!   lkctl verify license.lic
//!   lkctl info license.lic

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lkv_cli::{
    init_logging, load_or_generate_issuer_keys, log_level, Command, GenArgs, InfoKind,
    IssueReport, KeyArgs, LkctlArgs, MachineReport, VerificationReport,
};
use lkv_license::{
    issue, license_info_file, verify_file, Fingerprint, IssuerKeys, KeyPaths, SystemFingerprint,
};
use tracing::info;

fn main() -> Result<ExitCode> {
    let args = LkctlArgs::parse();
    init_logging(log_level(args.verbose, false));

    match args.command {
        Command::Get { info } => print_machine_info(info),
        Command::Keys { output } => generate_keys(&output),
        Command::Gen(gen_args) => generate_license(&gen_args),
        Command::Verify { license, keys } => verify_license(&license, &keys),
        Command::Info { license, keys } => show_license(&license, &keys),
    }
}

fn print_machine_info(kind: InfoKind) -> Result<ExitCode> {
    let fingerprint = SystemFingerprint;
    let value = match kind {
        InfoKind::Mac => fingerprint
            .current_mac()
            .ok_or_else(|| anyhow!("failed to get MAC address"))?,
        InfoKind::Uuid => fingerprint
            .current_uuid()
            .ok_or_else(|| anyhow!("failed to get system UUID"))?,
        InfoKind::Cpuid => fingerprint
            .current_cpu_id()
            .ok_or_else(|| anyhow!("failed to get CPU ID"))?,
        InfoKind::All => {
            print!("{}", MachineReport(&fingerprint.current_all()));
            return Ok(ExitCode::SUCCESS);
        }
    };
    println!("{value}");
    Ok(ExitCode::SUCCESS)
}

fn generate_keys(output: &Path) -> Result<ExitCode> {
    let paths = KeyPaths::in_dir(output);
    let keys = IssuerKeys::generate().context("failed to generate keys")?;
    keys.save(&paths).context("failed to save keys")?;

    println!("Keys generated:");
    println!("  Private key: {}", paths.private_key.display());
    println!("  Public key: {}", paths.public_key.display());
    println!("  AES key: {}", paths.symmetric_key.display());
    Ok(ExitCode::SUCCESS)
}

fn generate_license(gen_args: &GenArgs) -> Result<ExitCode> {
    let options = gen_args.options()?;
    let source = load_or_generate_issuer_keys(
        gen_args.private_key.as_deref(),
        gen_args.aes_key.as_deref(),
        &gen_args.keys_dir,
    )?;

    let (record, envelope) =
        issue(&options, &source.keys).context("failed to generate license")?;

    if let Some(parent) = gen_args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    envelope
        .write_to_file(&gen_args.output)
        .context("failed to save license")?;
    info!("License {} written to {:?}", record.id, gen_args.output);

    print!(
        "{}",
        IssueReport {
            output: &gen_args.output,
            license: &record,
            generated_keys: &source.generated,
        }
    );
    Ok(ExitCode::SUCCESS)
}

fn verify_license(license: &Path, keys: &KeyArgs) -> Result<ExitCode> {
    let keys = keys.load()?;
    let result = verify_file(license, &keys, &SystemFingerprint)
        .with_context(|| format!("failed to read license {}", license.display()))?;

    print!("{}", VerificationReport(&result));
    Ok(if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn show_license(license: &Path, keys: &KeyArgs) -> Result<ExitCode> {
    let keys = keys.load()?;
    let record = license_info_file(license, &keys)
        .with_context(|| format!("failed to get license info from {}", license.display()))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(ExitCode::SUCCESS)
}
