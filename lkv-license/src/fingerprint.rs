//! Machine fingerprinting for license binding.
//!
//! The verifier asks a [`Fingerprint`] provider for the current MAC address,
//! system UUID and CPU id. [`SystemFingerprint`] probes the running machine on
//! a best-effort basis; every probe may come back empty, which only matters if
//! the license binds that field.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use md5::{Digest, Md5};

/// Snapshot of the machine identifiers used for binding.
///
/// An identifier that could not be determined is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    pub mac: String,
    pub uuid: String,
    #[serde(rename = "cpuid", alias = "cpu_id")]
    pub cpu_id: String,
}

/// Source of the current machine's identifiers.
pub trait Fingerprint: Send + Sync {
    /// Primary network interface MAC address.
    fn current_mac(&self) -> Option<String>;

    /// System/hardware UUID.
    fn current_uuid(&self) -> Option<String>;

    /// Hashed processor identifier.
    fn current_cpu_id(&self) -> Option<String>;

    /// All three identifiers; missing values become empty strings.
    fn current_all(&self) -> MachineInfo {
        MachineInfo {
            mac: self.current_mac().unwrap_or_default(),
            uuid: self.current_uuid().unwrap_or_default(),
            cpu_id: self.current_cpu_id().unwrap_or_default(),
        }
    }
}

impl<F: Fingerprint + ?Sized> Fingerprint for &F {
    fn current_mac(&self) -> Option<String> {
        (**self).current_mac()
    }

    fn current_uuid(&self) -> Option<String> {
        (**self).current_uuid()
    }

    fn current_cpu_id(&self) -> Option<String> {
        (**self).current_cpu_id()
    }
}

/// Fixed identifiers, for tests and for applications that collect the
/// fingerprint themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFingerprint {
    info: MachineInfo,
}

impl StaticFingerprint {
    pub fn new(mac: impl Into<String>, uuid: impl Into<String>, cpu_id: impl Into<String>) -> Self {
        Self {
            info: MachineInfo {
                mac: mac.into(),
                uuid: uuid.into(),
                cpu_id: cpu_id.into(),
            },
        }
    }
}

impl From<MachineInfo> for StaticFingerprint {
    fn from(info: MachineInfo) -> Self {
        Self { info }
    }
}

impl Fingerprint for StaticFingerprint {
    fn current_mac(&self) -> Option<String> {
        non_empty(&self.info.mac)
    }

    fn current_uuid(&self) -> Option<String> {
        non_empty(&self.info.uuid)
    }

    fn current_cpu_id(&self) -> Option<String> {
        non_empty(&self.info.cpu_id)
    }
}

/// Probes the running machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFingerprint;

impl Fingerprint for SystemFingerprint {
    fn current_mac(&self) -> Option<String> {
        get_mac_address()
    }

    fn current_uuid(&self) -> Option<String> {
        get_system_uuid()
    }

    fn current_cpu_id(&self) -> Option<String> {
        get_cpu_descriptor().map(|raw| hash_cpu_descriptor(&raw))
    }
}

/// Hashes a raw CPU descriptor into the stored CPU id form: the lowercase hex
/// MD5 digest, as written into licenses by earlier issuers.
#[must_use]
pub fn hash_cpu_descriptor(raw: &str) -> String {
    Md5::digest(raw.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn is_usable_mac(mac: &str) -> bool {
    !mac.is_empty() && mac != "00:00:00:00:00:00"
}

/// Gets the MAC address of the first non-loopback interface that is up.
fn get_mac_address() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        linux_mac_address(Path::new("/sys/class/net"))
    }

    #[cfg(target_os = "macos")]
    {
        let output = command_output("ifconfig", &[])?;
        let mut active_ether = None;
        for line in output.lines() {
            let line = line.trim();
            if let Some(mac) = line.strip_prefix("ether ") {
                active_ether = Some(mac.trim().to_lowercase());
            } else if line.starts_with("status: active") {
                if let Some(mac) = active_ether.take().filter(|m| is_usable_mac(m)) {
                    return Some(mac);
                }
            }
        }
        None
    }

    #[cfg(target_os = "windows")]
    {
        let output = command_output("getmac", &["/fo", "csv", "/nh"])?;
        output.lines().find_map(|line| {
            let mac = line.split(',').next()?.trim().trim_matches('"');
            let mac = mac.replace('-', ":").to_lowercase();
            is_usable_mac(&mac).then_some(mac)
        })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

const IFF_UP: u32 = 0x1;
const IFF_LOOPBACK: u32 = 0x8;

/// Walks `net_dir` (normally `/sys/class/net`) in interface index order and
/// returns the first usable address of an interface with `IFF_UP` set,
/// whatever its `operstate`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn linux_mac_address(net_dir: &Path) -> Option<String> {
    let mut interfaces: Vec<(u32, PathBuf)> = std::fs::read_dir(net_dir)
        .ok()?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            let index = read_sysfs(&path.join("ifindex"))?.parse().ok()?;
            Some((index, path))
        })
        .collect();
    interfaces.sort_by_key(|(index, _)| *index);

    interfaces.into_iter().find_map(|(_, path)| {
        let flags = read_sysfs(&path.join("flags"))?;
        let flags = u32::from_str_radix(flags.trim_start_matches("0x"), 16).ok()?;
        if flags & IFF_UP == 0 || flags & IFF_LOOPBACK != 0 {
            return None;
        }
        let mac = read_sysfs(&path.join("address"))?.to_lowercase();
        is_usable_mac(&mac).then_some(mac)
    })
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn read_sysfs(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Gets the system UUID (platform-specific hardware identifier).
fn get_system_uuid() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/sys/class/dmi/id/product_uuid")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "macos")]
    {
        command_output("system_profiler", &["SPHardwareDataType"])?
            .lines()
            .find(|l| l.contains("Hardware UUID:"))
            .and_then(|l| l.split_once(':'))
            .map(|(_, uuid)| uuid.trim().to_string())
    }

    #[cfg(target_os = "windows")]
    {
        first_value_line(
            &command_output(
                "powershell",
                &[
                    "-Command",
                    "Get-CimInstance -ClassName Win32_ComputerSystemProduct | Select-Object -ExpandProperty UUID",
                ],
            )?,
            "UUID",
        )
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Gets the raw, unhashed CPU descriptor.
fn get_cpu_descriptor() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        parse_linux_cpuinfo(&cpuinfo)
    }

    #[cfg(target_os = "macos")]
    {
        command_output("sysctl", &["-n", "machdep.cpu.brand_string"])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "windows")]
    {
        first_value_line(
            &command_output(
                "powershell",
                &[
                    "-Command",
                    "Get-CimInstance -ClassName Win32_Processor | Select-Object -ExpandProperty ProcessorId",
                ],
            )?,
            "ProcessorId",
        )
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Picks the stable identifying lines for the first processor.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_linux_cpuinfo(cpuinfo: &str) -> Option<String> {
    let first = cpuinfo.split("\n\n").next()?;
    let wanted = ["vendor_id", "cpu family", "model", "model name", "CPU implementer", "CPU part"];

    let lines: Vec<&str> = first
        .lines()
        .filter(|line| {
            line.split_once(':')
                .is_some_and(|(key, _)| wanted.contains(&key.trim()))
        })
        .map(str::trim)
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    std::process::Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
}

#[cfg(target_os = "windows")]
fn first_value_line(output: &str, header: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.contains(header) && !l.contains("---"))
        .map(String::from)
}
