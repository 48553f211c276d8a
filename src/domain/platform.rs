use std::fmt;

/// Operating systems that have a published early-access artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Maps an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }

    /// Platform of the running process. Unsupported systems get the Windows
    /// artifact, which most likely won't run there.
    pub fn current() -> Self {
        let os = std::env::consts::OS;
        Self::from_os(os).unwrap_or_else(|| {
            log::warn!(
                "No early-access build is published for {}, falling back to the Windows artifact",
                os
            );
            Platform::Windows
        })
    }

    fn artifact_name(self, version: u32) -> String {
        match self {
            Platform::Windows => format!("Windows-Yuzu-EA-{}.zip", version),
            Platform::Linux => format!("Linux-Yuzu-EA-{}.AppImage", version),
        }
    }

    /// Release asset URL of `version` under the repository at `repo_base`.
    pub fn download_url(self, repo_base: &str, version: u32) -> String {
        format!(
            "{}/releases/download/EA-{}/{}",
            repo_base.trim_end_matches('/'),
            version,
            self.artifact_name(version)
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::Linux => f.write_str("linux"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://github.com/pineappleEA/pineapple-src/";

    #[test]
    fn test_windows_url() {
        assert_eq!(
            Platform::Windows.download_url(REPO, 4079),
            "https://github.com/pineappleEA/pineapple-src/releases/download/EA-4079/Windows-Yuzu-EA-4079.zip"
        );
    }

    #[test]
    fn test_linux_url() {
        assert_eq!(
            Platform::Linux.download_url(REPO, 4079),
            "https://github.com/pineappleEA/pineapple-src/releases/download/EA-4079/Linux-Yuzu-EA-4079.AppImage"
        );
    }

    #[test]
    fn test_repo_base_without_trailing_slash() {
        assert_eq!(
            Platform::Linux.download_url("https://example.com/repo", 1),
            "https://example.com/repo/releases/download/EA-1/Linux-Yuzu-EA-1.AppImage"
        );
    }

    #[test]
    fn test_from_os() {
        assert_eq!(Platform::from_os("windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_os("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_os("macos"), None);
        assert_eq!(Platform::from_os("freebsd"), None);
    }
}
