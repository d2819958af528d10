/// ASCII whitespace
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// Link relations that make the browser reach out to the network
pub const RESOURCE_HINTS: &[&str] = &[
    "dns-prefetch",
    "manifest",
    "modulepreload",
    "preconnect",
    "prefetch",
    "preload",
    "prerender",
];

/// Content security policy of a converted document
///
/// Only inline and `data:` content may load; scripts stay blocked unless enabled.
pub fn compose_csp(enable_scripts: bool) -> String {
    let script_src = if enable_scripts {
        "'self' 'unsafe-inline' data:"
    } else {
        "'none'"
    };

    format!(
        "default-src 'none'; connect-src 'self' data:; font-src 'self' data:; \
         img-src 'self' data:; style-src 'self' 'unsafe-inline' data:; \
         frame-src 'self' data:; media-src 'self' data:; object-src 'self' data:; \
         script-src {script_src};"
    )
}

/// `rel` value with resource hints removed, `None` when nothing is left
pub fn strip_resource_hints(rel: &str) -> Option<String> {
    let kept: Vec<&str> = rel
        .split_whitespace()
        .filter(|token| {
            !RESOURCE_HINTS
                .iter()
                .any(|hint| token.eq_ignore_ascii_case(hint))
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}
