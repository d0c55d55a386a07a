use crate::errors::ToolError;
use url::Url;

/// Where one operation call goes: a fixed base path, an optional resource id
/// appended as its own path segment, and an already-encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_path: String,
    segment: Option<String>,
    query: String,
}

impl Endpoint {
    pub fn flat(base_path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            segment: None,
            query: query.into(),
        }
    }

    /// Targets one resource when `id` is present. Accompanying query
    /// parameters are kept as given; dropping them is up to the caller.
    pub fn scoped(base_path: impl Into<String>, id: Option<&str>, query: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            segment: id.map(|s| s.to_string()),
            query: query.into(),
        }
    }

    pub fn url(&self) -> Result<String, ToolError> {
        let mut url = Url::parse(&self.base_path).map_err(|err| {
            ToolError::internal(format!("Invalid endpoint base '{}': {}", self.base_path, err))
        })?;
        if let Some(segment) = &self.segment {
            url.path_segments_mut()
                .map_err(|_| ToolError::internal("Endpoint base cannot carry path segments"))?
                .pop_if_empty()
                .push(segment);
        }
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.query));
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.humansecurity.com/v1/cyberfraud";

    #[test]
    fn flat_endpoint_appends_query() {
        let endpoint = Endpoint::flat(format!("{}/custom-rules", BASE), "a=1&a=2");
        assert_eq!(
            endpoint.url().expect("url"),
            "https://api.humansecurity.com/v1/cyberfraud/custom-rules?a=1&a=2"
        );
    }

    #[test]
    fn empty_query_leaves_no_question_mark() {
        let endpoint = Endpoint::flat(format!("{}/custom-rules", BASE), "");
        assert_eq!(
            endpoint.url().expect("url"),
            "https://api.humansecurity.com/v1/cyberfraud/custom-rules"
        );
    }

    #[test]
    fn scoped_endpoint_escapes_the_id_segment() {
        let endpoint = Endpoint::scoped(format!("{}/account", BASE), Some("a b/c"), "daysRange=5");
        assert_eq!(
            endpoint.url().expect("url"),
            "https://api.humansecurity.com/v1/cyberfraud/account/a%20b%2Fc?daysRange=5"
        );
    }

    #[test]
    fn scoped_endpoint_without_id_is_flat() {
        let endpoint = Endpoint::scoped(format!("{}/overview", BASE), None, "page=1");
        assert_eq!(
            endpoint.url().expect("url"),
            "https://api.humansecurity.com/v1/cyberfraud/overview?page=1"
        );
    }
}
