//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use mhtml_to_html::parsers::html::{
        append_child, create_element, create_text_node, find_elements, get_head, get_node_attr,
        get_text_content, html_to_dom, insert_after, prepend_child, remove_node, replace_node,
        serialize_document, set_node_attr, set_text_content,
    };

    #[test]
    fn elements_in_document_order() {
        let dom = html_to_dom("<div><p id=a></p><section><p id=b></p></section></div><p id=c></p>");

        let ids: Vec<String> = find_elements(&dom.document, "p")
            .iter()
            .filter_map(|node| get_node_attr(node, "id"))
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn attributes() {
        let dom = html_to_dom("<img src=a.png alt=x>");
        let img = &find_elements(&dom.document, "img")[0];

        set_node_attr(img, "src", Some("b.png".to_string()));
        set_node_attr(img, "alt", None);
        set_node_attr(img, "loading", Some("lazy".to_string()));

        assert!(serialize_document(&dom).contains("<img src=\"b.png\" loading=\"lazy\">"));
    }

    #[test]
    fn create_and_insert() {
        let dom = html_to_dom("<html><head><title>T</title></head><body></body></html>");
        let head = get_head(&dom.document).unwrap();

        let meta = create_element(&dom, "meta", &[("charset", "utf-8")]);
        prepend_child(&head, &meta);
        let link = create_element(&dom, "link", &[("rel", "icon"), ("href", "a.ico")]);
        insert_after(&meta, &link);
        let style = create_element(&dom, "style", &[]);
        append_child(&style, &create_text_node("a>b{}"));
        append_child(&head, &style);

        assert_eq!(
            serialize_document(&dom),
            "<html><head><meta charset=\"utf-8\"><link rel=\"icon\" href=\"a.ico\">\
             <title>T</title><style>a>b{}</style></head><body></body></html>"
        );
    }

    #[test]
    fn remove_and_replace() {
        let dom = html_to_dom("<body><script>x()</script><link rel=stylesheet href=a.css></body>");
        remove_node(&find_elements(&dom.document, "script")[0]);

        let style = create_element(&dom, "style", &[]);
        set_text_content(&style, "p{}");
        replace_node(&find_elements(&dom.document, "link")[0], &style);

        assert_eq!(
            serialize_document(&dom),
            "<html><head></head><body><style>p{}</style></body></html>"
        );
    }

    #[test]
    fn text_content() {
        let dom = html_to_dom("<title>Hello <b>big</b> world</title><style>a{}</style>");
        let style = &find_elements(&dom.document, "style")[0];

        set_text_content(style, "b{}");

        assert_eq!(get_text_content(style), "b{}");
        assert_eq!(
            get_text_content(&find_elements(&dom.document, "title")[0]),
            "Hello <b>big</b> world"
        );
    }
}
