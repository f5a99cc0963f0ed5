//! Commit-count approximation from pagination metadata.
//!
//! With `per_page=1` every page holds one commit, so the page number of the
//! `rel="last"` link equals the total commit count.

use url::Url;

use super::CommitPage;

const LAST_REL: &str = r#"rel="last""#;

/// Page number of the `rel="last"` entry of a `Link` header
pub fn last_page(link_header: &str) -> Option<u64> {
    link_header
        .split(',')
        .find(|entry| entry.split(';').skip(1).any(|param| param.trim() == LAST_REL))
        .and_then(|entry| {
            let start = entry.find('<')?;
            let end = entry.find('>')?;
            page_param(entry.get(start + 1..end)?)
        })
}

fn page_param(target: &str) -> Option<u64> {
    Url::parse(target)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Approximate total commits for a single-commit page.
///
/// Without a `rel="last"` link the page is the only one: one commit if it has
/// an entry, unknown otherwise.
pub fn commit_count(page: &CommitPage) -> Option<u64> {
    match page.link.as_deref().and_then(last_page) {
        Some(last) => Some(last),
        None if !page.commits.is_empty() => Some(1),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::CommitEntry;

    const GITHUB_LINK: &str = r#"<https://api.github.com/repositories/1296269/commits?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1296269/commits?per_page=1&page=341>; rel="last""#;

    #[test]
    fn test_last_page_from_github_header() {
        assert_eq!(last_page(GITHUB_LINK), Some(341));
    }

    #[test]
    fn test_per_page_is_not_mistaken_for_page() {
        let link = r#"<https://api.github.com/x/commits?page=7&per_page=1>; rel="last""#;
        assert_eq!(last_page(link), Some(7));
    }

    #[test]
    fn test_page_value_is_percent_decoded() {
        let link = r#"<https://api.github.com/x/commits?sha=main&per_page=1&page=%33%34>; rel="last""#;
        assert_eq!(last_page(link), Some(34));
    }

    #[test]
    fn test_unparseable_last_target() {
        assert_eq!(last_page(r#"<commits?page=3>; rel="last""#), None);
        assert_eq!(last_page(r#"<https://api.github.com/x/commits?page=abc>; rel="last""#), None);
    }

    #[test]
    fn test_no_last_relation() {
        let link = r#"<https://api.github.com/x/commits?per_page=1&page=1>; rel="prev", <https://api.github.com/x/commits?per_page=1&page=1>; rel="first""#;
        assert_eq!(last_page(link), None);
        assert_eq!(last_page(""), None);
        assert_eq!(last_page(r#"<https://api.github.com/x/commits>; rel="last""#), None);
    }

    #[test]
    fn test_commit_count_fallbacks() {
        let paged = CommitPage {
            commits: vec![CommitEntry::authored_at("2024-01-01T00:00:00Z")],
            link: Some(GITHUB_LINK.into()),
        };
        assert_eq!(commit_count(&paged), Some(341));

        let single = CommitPage {
            commits: vec![CommitEntry::authored_at("2024-01-01T00:00:00Z")],
            link: None,
        };
        assert_eq!(commit_count(&single), Some(1));

        assert_eq!(commit_count(&CommitPage::default()), None);
    }
}
