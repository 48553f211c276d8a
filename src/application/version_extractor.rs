use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::AppError;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EA ([0-9]+)").expect("version pattern is valid"));

const END_OF_DOCUMENT: &str = "</html>";

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedVersions {
    /// Page order, duplicates included.
    pub versions: Vec<u32>,
    /// Matched text for each version, e.g. `"EA 4079"`.
    pub raw_matches: HashMap<u32, String>,
}

/// Scan page lines for `EA <number>` markers, stopping at `</html>`.
pub fn extract_versions<I, S>(lines: I) -> Result<ExtractedVersions, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut versions = Vec::new();
    let mut raw_matches = HashMap::new();

    for line in lines {
        let line = line.as_ref();

        if let Some(caps) = VERSION_PATTERN.captures(line) {
            match caps[1].parse::<u32>() {
                Ok(version) => {
                    versions.push(version);
                    raw_matches.insert(version, caps[0].to_string());
                }
                Err(e) => log::warn!("Skipping unparsable version in {:?}: {}", line, e),
            }
        } else if line.trim_end_matches('\r') == END_OF_DOCUMENT {
            break;
        }
    }

    if versions.is_empty() {
        return Err(AppError::NoVersionsFound);
    }

    log::info!("Found {} versions on the release page", versions.len());
    Ok(ExtractedVersions {
        versions,
        raw_matches,
    })
}
