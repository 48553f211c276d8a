use std::collections::HashMap;

use super::{AppError, Platform};

/// Versions found on the release page, in page order, with the download
/// link of each one for a single platform.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionCatalog {
    platform: Platform,
    versions: Vec<u32>,
    links: HashMap<u32, String>,
}

impl VersionCatalog {
    pub fn resolve(versions: Vec<u32>, platform: Platform, repo_base: &str) -> Self {
        let links = versions
            .iter()
            .map(|&version| (version, platform.download_url(repo_base, version)))
            .collect();

        Self {
            platform,
            versions,
            links,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn versions(&self) -> &[u32] {
        &self.versions
    }

    /// `None` means the version can't be downloaded on this platform.
    pub fn link(&self, version: u32) -> Option<&str> {
        self.links.get(&version).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Created,
    Running,
    Completed,
    Cancelled,
    Failed(AppError),
}

/// Point-in-time view of a download.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub bytes_transferred: u64,
    pub total_bytes: Option<u64>,
    pub bytes_per_second: f64,
    pub state: JobState,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            bytes_transferred: 0,
            total_bytes: None,
            bytes_per_second: 0.0,
            state: JobState::Created,
        }
    }
}

impl ProgressSnapshot {
    /// Completion in `[0, 1]`. Stays at 0 while the size is unknown.
    pub fn fraction(&self) -> f32 {
        if self.state == JobState::Completed {
            return 1.0;
        }
        match self.total_bytes {
            Some(total) if total > 0 => {
                (self.bytes_transferred as f64 / total as f64).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_resolves_every_version() {
        let catalog = VersionCatalog::resolve(
            vec![4079, 4078, 4079],
            Platform::Windows,
            "https://example.com/repo/",
        );

        assert_eq!(catalog.versions(), &[4079, 4078, 4079]);
        for version in catalog.versions() {
            assert!(catalog.link(*version).is_some());
        }
        assert_eq!(
            catalog.link(4078),
            Some("https://example.com/repo/releases/download/EA-4078/Windows-Yuzu-EA-4078.zip")
        );
        assert_eq!(catalog.link(1), None);
    }

    #[test]
    fn test_fraction() {
        let mut snapshot = ProgressSnapshot::default();
        assert_eq!(snapshot.fraction(), 0.0);

        snapshot.state = JobState::Running;
        snapshot.total_bytes = Some(200);
        snapshot.bytes_transferred = 50;
        assert_eq!(snapshot.fraction(), 0.25);

        snapshot.bytes_transferred = 400;
        assert_eq!(snapshot.fraction(), 1.0);

        snapshot.total_bytes = None;
        assert_eq!(snapshot.fraction(), 0.0);

        snapshot.state = JobState::Completed;
        assert_eq!(snapshot.fraction(), 1.0);
    }
}
