//! Human-readable output.

use std::fmt;
use std::path::{Path, PathBuf};

use lkv_license::{LicenseRecord, MachineInfo, VerificationResult};

/// Timestamp format used in every report.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Verification outcome as printed by `lkctl verify` and `lkverify`.
pub struct VerificationReport<'a>(pub &'a VerificationResult);

impl fmt::Display for VerificationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        if !result.valid {
            writeln!(f, "✗ License verification failed")?;
            writeln!(f, "Error: {}", result.error.as_deref().unwrap_or("unknown error"))?;
            let machine = &result.machine_info;
            for (label, value) in [
                ("MAC", &machine.mac),
                ("UUID", &machine.uuid),
                ("CPUID", &machine.cpu_id),
            ] {
                if !value.is_empty() {
                    writeln!(f, "Current {label}: {value}")?;
                }
            }
            return Ok(());
        }

        writeln!(f, "✓ License verification passed")?;
        if let Some(license) = &result.license {
            write_license(f, license)?;
        }
        if result.expires_in > 0 {
            let days = result.expires_in / SECONDS_PER_DAY;
            let hours = (result.expires_in % SECONDS_PER_DAY) / 3600;
            writeln!(f, "Expires In: {days} days {hours} hours")?;
        }
        writeln!(f, "✓ Machine information matched")
    }
}

fn write_license(f: &mut fmt::Formatter<'_>, license: &LicenseRecord) -> fmt::Result {
    writeln!(f, "License ID: {}", license.id)?;
    writeln!(f, "Product Name: {}", license.product_name)?;
    if !license.customer_name.is_empty() {
        writeln!(f, "Customer Name: {}", license.customer_name)?;
    }
    writeln!(f, "Issued At: {}", license.issued_at.format(TIME_FORMAT))?;
    writeln!(f, "Expires At: {}", license.expires_at.format(TIME_FORMAT))?;
    if !license.features.is_empty() {
        writeln!(f, "Features: {}", license.features.join(", "))?;
    }
    if license.max_users > 0 {
        writeln!(f, "Max Users: {}", license.max_users)?;
    }
    if !license.notes.is_empty() {
        writeln!(f, "Notes: {}", license.notes)?;
    }
    Ok(())
}

/// `lkctl get all` output; unknown values are marked rather than omitted.
pub struct MachineReport<'a>(pub &'a MachineInfo);

impl fmt::Display for MachineReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.0;
        for (label, value) in [("MAC", &info.mac), ("UUID", &info.uuid), ("CPUID", &info.cpu_id)] {
            if value.is_empty() {
                writeln!(f, "{label}: <unknown>")?;
            } else {
                writeln!(f, "{label}: {value}")?;
            }
        }
        Ok(())
    }
}

/// Summary printed after `lkctl gen`.
pub struct IssueReport<'a> {
    pub output: &'a Path,
    pub license: &'a LicenseRecord,
    pub generated_keys: &'a [PathBuf],
}

impl fmt::Display for IssueReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "License generated: {}", self.output.display())?;
        for path in self.generated_keys {
            writeln!(f, "New key saved to {}", path.display())?;
        }
        writeln!(f, "License ID: {}", self.license.id)?;
        writeln!(f, "Expires at: {}", self.license.expires_at.format(TIME_FORMAT))
    }
}
