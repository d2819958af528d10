//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use mhtml_to_html::utils::url::{
        content_id_from_cid_url, is_http_url, normalize_url, remove_quotes, split_fragment,
    };

    #[test]
    fn http_urls() {
        assert!(is_http_url("http://example.com/"));
        assert!(is_http_url("https://example.com/"));
    }

    #[test]
    fn cid_url_case_insensitive() {
        assert_eq!(
            content_id_from_cid_url("CID:part1@example"),
            Some("<part1@example>".to_string())
        );
    }

    #[test]
    fn fragment_split() {
        assert_eq!(
            split_fragment("https://example.com/a?b=1#c"),
            Some(("https://example.com/a?b=1".to_string(), Some("c".to_string())))
        );
        assert_eq!(
            split_fragment("https://example.com/a"),
            Some(("https://example.com/a".to_string(), None))
        );
    }

    #[test]
    fn normalized_urls_compare_equal() {
        assert_eq!(
            normalize_url("https://EXAMPLE.com/page#section"),
            normalize_url("https://example.com/page")
        );
    }

    #[test]
    fn quotes() {
        assert_eq!(remove_quotes(" ' spaced ' "), "spaced");
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use mhtml_to_html::utils::url::{content_id_from_cid_url, is_http_url, normalize_url};

    #[test]
    fn other_schemes_are_not_http() {
        assert!(!is_http_url("ftp://example.com/"));
        assert!(!is_http_url("data:text/plain,a"));
        assert!(!is_http_url("//example.com/"));
    }

    #[test]
    fn short_cid_candidate() {
        assert_eq!(content_id_from_cid_url("ci"), None);
    }

    #[test]
    fn relative_urls_are_kept_as_is() {
        assert_eq!(normalize_url("page.html#top"), "page.html#top");
    }
}
