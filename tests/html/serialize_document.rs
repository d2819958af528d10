//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use mhtml_to_html::parsers::html::{html_to_dom, serialize_document};

    #[test]
    fn doctype_and_void_elements() {
        let html = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
                    <body><br><img src=\"a.png\"><input type=\"text\"></body></html>";

        assert_eq!(serialize_document(&html_to_dom(html)), html);
    }

    #[test]
    fn raw_text_elements_are_not_escaped() {
        let html = "<html><head><style>a > b { content: \"&\" }</style>\
                    <script>if (a < b && c) {}</script></head><body></body></html>";

        assert_eq!(serialize_document(&html_to_dom(html)), html);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let dom = html_to_dom("<p title='say \"hi\" & go'>1 &lt; 2 &amp; 3</p>");

        assert_eq!(
            serialize_document(&dom),
            "<html><head></head><body><p title=\"say &quot;hi&quot; &amp; go\">1 &lt; 2 &amp; 3</p></body></html>"
        );
    }
}
