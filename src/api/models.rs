/// Body of the release page, consumed line by line.
#[derive(Debug, Clone)]
pub struct ReleasePage {
    body: String,
}

impl ReleasePage {
    pub fn new(body: String) -> Self {
        Self { body }
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.body.lines()
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Page listing the published early-access versions
    pub release_page_url: String,
    /// GitHub repository hosting the release assets
    pub repo_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            release_page_url: "https://pineappleEA.github.io/".to_string(),
            repo_base: "https://github.com/pineappleEA/pineapple-src/".to_string(),
        }
    }
}
