use crate::upstream::Upstream;
use anyhow::Context;

pub const GROUPS_PATH: &str = "/group";

pub async fn list_groups<U: Upstream>(upstream: &U) -> Result<Vec<String>, anyhow::Error> {
    let body = upstream
        .fetch(GROUPS_PATH)
        .await
        .context("While fetching consumer group list")?;

    Ok(parse_group_list(&body))
}

/// Parses `["a","b","c"]` into group names. Brackets and quotes are only
/// stripped when the body is bracketed; otherwise the body is split as is.
pub fn parse_group_list(body: &str) -> Vec<String> {
    let body = body.trim();
    let body = if body.starts_with('[') && body.ends_with(']') {
        body.replace(['[', ']', '"'], "")
    } else {
        body.to_owned()
    };

    body.split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_upstream::FakeUpstream;

    #[test]
    fn bracketed_list_is_split_into_names() {
        assert_eq!(parse_group_list(r#"["a","b","c"]"#), vec!["a", "b", "c"]);
    }

    #[test]
    fn spaces_and_trailing_newline_are_ignored() {
        assert_eq!(
            parse_group_list("[\"orders\", \"payments\"]\n"),
            vec!["orders", "payments"]
        );
    }

    #[test]
    fn empty_list_yields_no_groups() {
        assert!(parse_group_list("[]").is_empty());
        assert!(parse_group_list("").is_empty());
    }

    #[test]
    fn unbracketed_body_is_split_verbatim() {
        assert_eq!(parse_group_list("a,b"), vec!["a", "b"]);
        assert_eq!(parse_group_list(r#""a",b"#), vec![r#""a""#, "b"]);
    }

    #[tokio::test]
    async fn list_groups_fails_when_upstream_fails() {
        let upstream = FakeUpstream::new();

        assert!(list_groups(&upstream).await.is_err());
    }

    #[tokio::test]
    async fn list_groups_reads_group_path() {
        let upstream = FakeUpstream::new().with(GROUPS_PATH, r#"["g1"]"#);

        assert_eq!(list_groups(&upstream).await.unwrap(), vec!["g1"]);
        assert_eq!(upstream.calls(), vec![GROUPS_PATH]);
    }
}
