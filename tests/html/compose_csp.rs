//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use mhtml_to_html::parsers::html::compose_csp;

    #[test]
    fn scripts_disabled() {
        assert_eq!(
            compose_csp(false),
            "default-src 'none'; connect-src 'self' data:; font-src 'self' data:; \
             img-src 'self' data:; style-src 'self' 'unsafe-inline' data:; \
             frame-src 'self' data:; media-src 'self' data:; object-src 'self' data:; \
             script-src 'none';"
        );
    }

    #[test]
    fn scripts_enabled() {
        assert_eq!(
            compose_csp(true),
            "default-src 'none'; connect-src 'self' data:; font-src 'self' data:; \
             img-src 'self' data:; style-src 'self' 'unsafe-inline' data:; \
             frame-src 'self' data:; media-src 'self' data:; object-src 'self' data:; \
             script-src 'self' 'unsafe-inline' data:;"
        );
    }
}
