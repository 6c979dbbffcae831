//! Reverse lookup from a connection string to its endpoint

use url::Url;

use crate::neon::Endpoint;

const POOLER_SUFFIX: &str = "-pooler";

/// Endpoint label of a connection string host, with any pooler suffix removed
pub fn endpoint_label(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let host = url.host_str()?;
    let label = host.split('.').next()?;
    Some(label.trim_end_matches(POOLER_SUFFIX).to_string())
}

/// Find the endpoint a connection string points at
pub fn match_endpoint<'a>(uri: &str, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint> {
    let label = endpoint_label(uri)?;
    endpoints.iter().find(|e| e.host_label() == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: &str, branch_id: &str) -> Endpoint {
        Endpoint {
            id: id.to_string(),
            host: format!("{}.us-east-2.aws.neon.tech", id),
            branch_id: branch_id.to_string(),
            endpoint_type: "read_write".to_string(),
            pooler_enabled: true,
        }
    }

    #[test]
    fn test_endpoint_label_pooled_and_direct() {
        assert_eq!(
            endpoint_label("postgresql://u:p@ep-cool-darkness-123-pooler.us-east-2.aws.neon.tech/neondb?sslmode=require")
                .as_deref(),
            Some("ep-cool-darkness-123")
        );
        assert_eq!(
            endpoint_label("postgres://u:p@ep-cool-darkness-123.us-east-2.aws.neon.tech/neondb")
                .as_deref(),
            Some("ep-cool-darkness-123")
        );
        assert_eq!(endpoint_label("not a url"), None);
    }

    #[test]
    fn test_match_endpoint() {
        let endpoints = vec![endpoint("ep-one-1", "br-1"), endpoint("ep-two-2", "br-2")];
        let uri = "postgresql://u:p@ep-two-2-pooler.us-east-2.aws.neon.tech/neondb";
        assert_eq!(match_endpoint(uri, &endpoints).unwrap().branch_id, "br-2");
    }

    #[test]
    fn test_match_endpoint_requires_exact_label() {
        let endpoints = vec![endpoint("ep-one-1", "br-1")];
        let uri = "postgresql://u:p@ep-one-10.us-east-2.aws.neon.tech/neondb";
        assert!(match_endpoint(uri, &endpoints).is_none());
    }
}
