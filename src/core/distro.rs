// Distribution detection for the Optimus capability probe
//
// Reads /etc/os-release through the command runner (so it sees the host
// file from inside a sandbox) and maps it onto the distribution families
// the switching workflow knows about.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::core::command::CommandRunner;
use crate::error::Result;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Distribution families the switching workflow distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Distribution {
    Suse,
    Ubuntu,
    Debian,
    Unknown,
}

impl Distribution {
    /// Families that ship a prime-select style switching tool
    pub fn is_supported(&self) -> bool {
        matches!(self, Distribution::Suse | Distribution::Ubuntu)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Distribution::Suse => write!(f, "SUSE"),
            Distribution::Ubuntu => write!(f, "Ubuntu"),
            Distribution::Debian => write!(f, "Debian"),
            Distribution::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Detects the running distribution
pub fn detect_distribution(
    runner: &dyn CommandRunner,
    os_release_path: &str,
) -> Result<Distribution> {
    let os_release = runner.read_stdout(&["cat", os_release_path])?;
    let distro = distribution_from_os_release(&os_release);
    log::debug!("Detected distribution: {}", distro);
    Ok(distro)
}

/// Whether the running distribution is one of the supported families
pub fn is_distro_supported(runner: &dyn CommandRunner, os_release_path: &str) -> Result<bool> {
    Ok(detect_distribution(runner, os_release_path)?.is_supported())
}

/// Classifies the contents of an os-release file
pub fn distribution_from_os_release(os_release: &str) -> Distribution {
    let fields = parse_os_release(os_release);
    let id = fields.get("ID").map(String::as_str).unwrap_or("");

    // ID_LIKE lists parent distributions; the distro's own ID comes last
    let candidates = fields
        .get("ID_LIKE")
        .map(|like| like.split_whitespace().collect::<Vec<_>>())
        .unwrap_or_default();

    for candidate in candidates.into_iter().chain(std::iter::once(id)) {
        match candidate {
            "opensuse" | "suse" => return Distribution::Suse,
            "debian" => {
                return if id == "ubuntu" {
                    Distribution::Ubuntu
                } else {
                    Distribution::Debian
                };
            }
            _ => {}
        }
    }

    Distribution::Unknown
}

/// Parses KEY=VALUE lines; lines that do not split into exactly two
/// parts are skipped
fn parse_os_release(os_release: &str) -> HashMap<String, String> {
    os_release
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split('=').collect();
            if parts.len() != 2 {
                return None;
            }
            Some((parts[0].to_string(), parts[1].replace('"', "")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::testing::{Scripted, ScriptedRunner};
    use crate::error::ProbeError;

    const TUMBLEWEED: &str = r#"NAME="openSUSE Tumbleweed"
ID="opensuse-tumbleweed"
ID_LIKE="opensuse suse"
VERSION_ID="20240101"
"#;

    const UBUNTU: &str = r#"PRETTY_NAME="Ubuntu 22.04.4 LTS"
NAME="Ubuntu"
VERSION_ID="22.04"
ID=ubuntu
ID_LIKE=debian
"#;

    const POP_OS: &str = r#"NAME="Pop!_OS"
ID=pop
ID_LIKE="ubuntu debian"
"#;

    const DEBIAN: &str = r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
NAME="Debian GNU/Linux"
ID=debian
"#;

    const FEDORA: &str = r#"NAME="Fedora Linux"
ID=fedora
"#;

    #[test]
    fn suse_family_is_detected_through_id_like() {
        assert_eq!(distribution_from_os_release(TUMBLEWEED), Distribution::Suse);
    }

    #[test]
    fn ubuntu_is_told_apart_from_debian() {
        assert_eq!(distribution_from_os_release(UBUNTU), Distribution::Ubuntu);
        assert_eq!(distribution_from_os_release(POP_OS), Distribution::Debian);
    }

    #[test]
    fn missing_id_like_falls_back_to_id() {
        assert_eq!(distribution_from_os_release(DEBIAN), Distribution::Debian);
    }

    #[test]
    fn unrecognized_distributions_are_unknown() {
        assert_eq!(distribution_from_os_release(FEDORA), Distribution::Unknown);
        assert_eq!(distribution_from_os_release(""), Distribution::Unknown);
    }

    #[test]
    fn only_suse_and_ubuntu_are_supported() {
        assert!(Distribution::Suse.is_supported());
        assert!(Distribution::Ubuntu.is_supported());
        assert!(!Distribution::Debian.is_supported());
        assert!(!Distribution::Unknown.is_supported());
    }

    #[test]
    fn detection_reads_os_release_through_runner() {
        let runner = ScriptedRunner::new()
            .on("cat /etc/os-release", Scripted::Stdout(UBUNTU.to_string()));
        assert_eq!(detect_distribution(&runner, OS_RELEASE_PATH).unwrap(), Distribution::Ubuntu);
        assert!(is_distro_supported(&runner, OS_RELEASE_PATH).unwrap());
    }

    #[test]
    fn unreadable_os_release_is_an_error() {
        let runner = ScriptedRunner::new().on("cat /etc/os-release", Scripted::Exit(1));
        assert!(matches!(
            detect_distribution(&runner, OS_RELEASE_PATH),
            Err(ProbeError::Execution(_))
        ));
    }
}
