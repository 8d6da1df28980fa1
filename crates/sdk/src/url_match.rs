//! Loose URL comparison for matching companies by website or LinkedIn page.

const SCHEMES: [&str; 2] = ["https://", "http://"];
const WWW: &str = "www.";

/// Reduce a URL to a comparable form.
///
/// Lowercases, drops any leading `http://`/`https://` and `www.` prefixes and
/// trailing slashes: `https://www.LinkedIn.com/company/acme/` becomes
/// `linkedin.com/company/acme`. Applying it twice gives the same result.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_lowercase();
    let mut rest = lower.as_str();

    loop {
        let before = rest.len();
        for scheme in SCHEMES {
            if let Some(stripped) = rest.strip_prefix(scheme) {
                rest = stripped;
            }
        }
        if let Some(stripped) = rest.strip_prefix(WWW) {
            rest = stripped;
        }
        if rest.len() == before {
            break;
        }
    }

    rest.trim_end_matches('/').to_string()
}

/// Normalize an optional URL, treating blank results as absent.
pub(crate) fn normalize_opt(url: Option<&str>) -> Option<String> {
    url.map(normalize_url).filter(|u| !u.is_empty())
}
