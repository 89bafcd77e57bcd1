//! URL normalisation and registrable-domain resolution.

use url::Url;

/// Turn a free-text URL or host string into a well-formed HTTP(S) URL.
///
/// Strings without a scheme separator are assumed to be `https`. Any scheme
/// other than `http` or `https` is rejected, including schemes that were
/// already present in the input.
pub fn normalize_url(raw: &str) -> Option<Url> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let url = Url::parse(&candidate).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

/// Resolve the registrable domain (eTLD+1) of a hostname.
///
/// The host is decoded from punycode to Unicode for public-suffix rule
/// matching, then the resolved domain is re-encoded to ASCII so downstream
/// comparisons run against the same representation candidate domains use.
/// Hosts that fail IDNA decoding or have no recognised public suffix
/// resolve to `None`.
pub fn registrable_domain(host: &str) -> Option<String> {
    let (unicode, decoded) = idna::domain_to_unicode(host);
    decoded.ok()?;

    let domain = psl::domain(unicode.as_bytes())?;
    if !domain.suffix().is_known() {
        return None;
    }

    let domain = std::str::from_utf8(domain.as_bytes()).ok()?;
    let ascii = idna::domain_to_ascii(domain).ok()?;
    Some(ascii.to_lowercase())
}
