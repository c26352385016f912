/// Builds image CDN URLs from the relative paths the catalog returns
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

pub const DEFAULT_POSTER_SIZE: &str = "w500";
pub const DEFAULT_BACKDROP_SIZE: &str = "w780";

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `None` when the movie has no poster
    pub fn poster_url(&self, path: Option<&str>, size: Option<&str>) -> Option<String> {
        self.image_url(path, size.unwrap_or(DEFAULT_POSTER_SIZE))
    }

    /// `None` when the movie has no backdrop
    pub fn backdrop_url(&self, path: Option<&str>, size: Option<&str>) -> Option<String> {
        self.image_url(path, size.unwrap_or(DEFAULT_BACKDROP_SIZE))
    }

    fn image_url(&self, path: Option<&str>, size: &str) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        Some(format!("{}/{}{}{}", self.base_url, size, separator, path))
    }
}
