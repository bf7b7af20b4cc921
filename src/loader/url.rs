use regex::Regex;
use std::sync::LazyLock;

const RAW_HOST: &str = "https://raw.githubusercontent.com";

// https://raw.githubusercontent.com/<owner>/<repo>/refs/heads/<branch>/<path>
// repeated ref segments are all stripped in one pass
static VERSIONED_RAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://raw\.githubusercontent\.com/[^/]+/[^/]+/)(?:refs/(?:heads|tags)/)+(.+)$",
    )
    .expect("versioned raw url pattern")
});

// https://github.com/<owner>/<repo>/blob/<branch>/<path>
static BLOB_VIEW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([^/]+)/([^/]+)/blob/(.+)$")
        .expect("blob view url pattern")
});

/// Rewrites the URL shapes a user is likely to paste into the raw-content form
/// that actually serves the file bytes. Unknown shapes pass through.
pub fn normalize_source_url(url: &str) -> String {
    let url = url.trim();

    let url = match BLOB_VIEW.captures(url) {
        Some(caps) => format!("{}/{}/{}/{}", RAW_HOST, &caps[1], &caps[2], &caps[3]),
        None => url.to_string(),
    };

    VERSIONED_RAW.replace(&url, "${1}${2}").into_owned()
}

const SINGULAR: &str = "item.json";
const PLURAL: &str = "items.json";

/// The same URL with the final path segment swapped between `item.json` and
/// `items.json`. `None` when the URL names neither file.
pub fn alternate_filename(url: &str) -> Option<String> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let (dir, file) = path.rsplit_once('/')?;

    let swapped = match file {
        SINGULAR => PLURAL,
        PLURAL => SINGULAR,
        _ => return None,
    };

    Some(match query {
        Some(query) => format!("{}/{}?{}", dir, swapped, query),
        None => format!("{}/{}", dir, swapped),
    })
}

#[cfg(test)]
mod tests {
    use super::{alternate_filename, normalize_source_url};

    #[test]
    fn strips_versioned_ref_from_raw_urls() {
        assert_eq!(
            normalize_source_url(
                "https://raw.githubusercontent.com/usuario/repositorio/refs/heads/main/items.json"
            ),
            "https://raw.githubusercontent.com/usuario/repositorio/main/items.json"
        );
        assert_eq!(
            normalize_source_url(
                "https://raw.githubusercontent.com/usuario/repositorio/refs/tags/v1/data/items.json"
            ),
            "https://raw.githubusercontent.com/usuario/repositorio/v1/data/items.json"
        );
    }

    #[test]
    fn rewrites_blob_view_to_raw_host() {
        assert_eq!(
            normalize_source_url(
                "https://github.com/usuario/repositorio/blob/main/quiz/items.json"
            ),
            "https://raw.githubusercontent.com/usuario/repositorio/main/quiz/items.json"
        );
        assert_eq!(
            normalize_source_url(
                "https://github.com/usuario/repositorio/blob/refs/heads/dev/items.json"
            ),
            "https://raw.githubusercontent.com/usuario/repositorio/dev/items.json"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "https://raw.githubusercontent.com/usuario/repositorio/main/items.json",
            "https://raw.githubusercontent.com/usuario/repositorio/refs/heads/main/items.json",
            "https://github.com/usuario/repositorio/blob/main/items.json",
            "https://example.org/quiz.json",
        ];
        for input in inputs {
            let once = normalize_source_url(input);
            assert_eq!(normalize_source_url(&once), once, "input: {input}");
        }
    }

    #[test]
    fn repeated_ref_segments_normalize_in_one_pass() {
        let url = "https://github.com/o/r/blob/refs/heads/refs/heads/main/items.json";
        let once = normalize_source_url(url);
        assert_eq!(once, "https://raw.githubusercontent.com/o/r/main/items.json");
        assert_eq!(normalize_source_url(&once), once);
    }

    #[test]
    fn leaves_other_urls_alone() {
        assert_eq!(
            normalize_source_url("  https://example.org/refs/heads/items.json "),
            "https://example.org/refs/heads/items.json"
        );
        assert_eq!(
            normalize_source_url("https://github.com/usuario/repositorio/tree/main"),
            "https://github.com/usuario/repositorio/tree/main"
        );
    }

    #[test]
    fn alternate_swaps_both_directions() {
        assert_eq!(
            alternate_filename("https://h.test/a/items.json").as_deref(),
            Some("https://h.test/a/item.json")
        );
        assert_eq!(
            alternate_filename("https://h.test/a/item.json").as_deref(),
            Some("https://h.test/a/items.json")
        );
        assert_eq!(
            alternate_filename("https://h.test/a/item.json?token=x").as_deref(),
            Some("https://h.test/a/items.json?token=x")
        );
    }

    #[test]
    fn no_alternate_for_other_filenames() {
        assert_eq!(alternate_filename("https://h.test/a/quiz.json"), None);
        assert_eq!(alternate_filename("https://h.test/a/my-items.json"), None);
        assert_eq!(alternate_filename("items.json"), None);
    }
}
