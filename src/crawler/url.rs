//! URL parsing for review site links
//!
//! Links found on review pages come in several shapes: absolute URLs,
//! site-relative paths and scheme-less hosts such as
//! `www.openrice.com/zh/hongkong/r-123`. [`Link`] parses all of them and
//! exposes the parts the crawler filters on, with registered domains computed
//! against the public suffix list.

use url::Url;

/// A parsed absolute link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    url: Url,
    scheme_less: bool,
}

impl Link {
    /// Parse a link, accepting scheme-less hosts
    ///
    /// Returns `None` for site-relative paths and anything without a host.
    ///
    /// # Examples
    ///
    /// ```
    /// use review_crawler::crawler::url::Link;
    ///
    /// let link = Link::parse("https://www.openrice.com/zh/hongkong/r-123").unwrap();
    /// assert_eq!(link.domain_label(), Some("openrice"));
    /// assert_eq!(link.subdomain(), Some("www"));
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('/') {
            return None;
        }

        let (url, scheme_less) = match Url::parse(raw) {
            Ok(url) => (url, false),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                (Url::parse(&format!("http://{raw}")).ok()?, true)
            }
            Err(_) => return None,
        };

        url.host_str()?;
        Some(Self { url, scheme_less })
    }

    /// Lowercase host name
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Registered domain including its public suffix (`openrice.com`)
    pub fn registered_domain(&self) -> Option<&str> {
        psl::domain_str(self.host())
    }

    /// Registered domain label without the public suffix (`openrice`)
    pub fn domain_label(&self) -> Option<&str> {
        let domain = self.registered_domain()?;
        let suffix = psl::suffix_str(domain)?;
        domain
            .strip_suffix(suffix)
            .and_then(|label| label.strip_suffix('.'))
    }

    /// Everything left of the registered domain (`www`, `m`, `a.b`)
    ///
    /// Returns `None` when the host is the bare registered domain.
    pub fn subdomain(&self) -> Option<&str> {
        let domain = self.registered_domain()?;
        self.host()
            .strip_suffix(domain)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|rest| !rest.is_empty())
    }

    /// URL path
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Whether the path carries the `/<language>/` segment
    pub fn has_language(&self, language: &str) -> bool {
        self.path().contains(&format!("/{language}/"))
    }

    /// Whether the raw link had no scheme and `http` was assumed
    pub fn is_scheme_less(&self) -> bool {
        self.scheme_less
    }

    /// The parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

/// Make a site-relative path absolute against the canonical origin
///
/// The origin's trailing slash, if any, is dropped so the result has a
/// single separator.
pub fn absolutize(origin: &str, path: &str) -> String {
    format!("{}{path}", origin.trim_end_matches('/'))
}
