//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use crate::common::{build_archive, Part, BOUNDARY, PNG};
    use mhtml_to_html::parsers::mhtml::headers::get_boundary;
    use mhtml_to_html::parsers::mhtml::{parse, ResourceData, TransferEncoding};

    fn text_of(mhtml: &mhtml_to_html::Mhtml, id: &str) -> String {
        let key = mhtml.resources.find(id).unwrap();
        mhtml.resources.get(key).unwrap().data.as_text().unwrap().to_string()
    }

    #[test]
    fn one_resource_per_part() {
        let archive = build_archive(&[
            Part::html("https://example.com/", "<html><body></body></html>"),
            Part::css("https://example.com/style.css", "p{}"),
            Part::png("https://example.com/dot.png"),
        ]);

        let mhtml = parse(&archive);

        assert_eq!(mhtml.resources.len(), 3);
        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/"));
        assert_eq!(text_of(&mhtml, "https://example.com/style.css"), "p{}");
    }

    #[test]
    fn top_level_headers() {
        let mhtml = parse(&build_archive(&[Part::html("https://example.com/", "<p></p>")]));

        assert_eq!(mhtml.headers.get("subject"), Some("Test page"));
        assert_eq!(
            get_boundary(mhtml.headers.get("Content-Type").unwrap()).as_deref(),
            Some(BOUNDARY)
        );
    }

    #[test]
    fn lf_line_endings() {
        let archive = build_archive(&[
            Part::html("https://example.com/", "<p>a</p>"),
            Part::css("https://example.com/style.css", "p{}"),
        ]);
        let archive = String::from_utf8(archive).unwrap().replace("\r\n", "\n");

        let mhtml = parse(archive.as_bytes());

        assert_eq!(mhtml.resources.len(), 2);
        assert_eq!(text_of(&mhtml, "https://example.com/style.css"), "p{}");
    }

    #[test]
    fn quoted_printable_part() {
        let archive = build_archive(&[Part::new(
            &[
                ("Content-Type", "text/plain; charset=utf-8"),
                ("Content-Transfer-Encoding", "quoted-printable"),
                ("Content-Location", "https://example.com/notes.txt"),
            ],
            "Caf=C3=A9 =\r\nau lait",
        )]);

        let mhtml = parse(&archive);

        assert_eq!(text_of(&mhtml, "https://example.com/notes.txt"), "Café au lait");
    }

    #[test]
    fn latin1_part_becomes_utf8() {
        let archive = build_archive(&[Part::new(
            &[
                ("Content-Type", "text/plain; charset=iso-8859-1"),
                ("Content-Transfer-Encoding", "quoted-printable"),
                ("Content-Location", "https://example.com/menu.txt"),
            ],
            "Caf=E9",
        )]);

        let mhtml = parse(&archive);
        let key = mhtml.resources.find("https://example.com/menu.txt").unwrap();
        let resource = mhtml.resources.get(key).unwrap();

        assert_eq!(resource.data.as_text(), Some("Café"));
        assert_eq!(resource.content_type, "text/plain; charset=utf-8");
    }

    #[test]
    fn base64_binary_part() {
        let mhtml = parse(&build_archive(&[Part::png("https://example.com/dot.png")]));
        let key = mhtml.resources.find("https://example.com/dot.png").unwrap();
        let resource = mhtml.resources.get(key).unwrap();

        assert_eq!(resource.data, ResourceData::Binary(PNG.to_vec()));
        assert_eq!(resource.transfer_encoding, Some(TransferEncoding::Base64));
        assert!(mhtml.index.is_none());
    }

    #[test]
    fn content_id_addresses_frames() {
        let archive = build_archive(&[
            Part::html("https://example.com/", "<iframe src=\"cid:frame-1@mhtml.blink\"></iframe>"),
            Part::new(
                &[
                    ("Content-Type", "text/html"),
                    ("Content-ID", "<frame-1@mhtml.blink>"),
                ],
                "<p>framed</p>",
            ),
        ]);

        let mhtml = parse(&archive);
        let key = mhtml.resources.frame("<frame-1@mhtml.blink>").unwrap();
        let frame = mhtml.resources.get(key).unwrap();

        assert!(frame.id.starts_with('_'));
        assert_eq!(frame.data.as_text(), Some("<p>framed</p>"));
        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn first_location_wins() {
        let archive = build_archive(&[
            Part::css("https://example.com/a.css", "first{}"),
            Part::css("https://example.com/a.css", "second{}"),
        ]);

        let mhtml = parse(&archive);

        assert_eq!(mhtml.resources.len(), 2);
        assert_eq!(text_of(&mhtml, "https://example.com/a.css"), "first{}");
    }

    #[test]
    fn nested_alternative_provides_the_index() {
        let nested = "--inner\r\n\
Content-Type: text/plain\r\n\
Content-Location: https://example.com/plain\r\n\
\r\n\
plain\r\n\
--inner\r\n\
Content-Type: text/html\r\n\
Content-Location: https://example.com/rich\r\n\
\r\n\
<p>rich</p>\r\n\
--inner--";
        let archive = build_archive(&[
            Part::new(
                &[("Content-Type", "multipart/alternative; boundary=\"inner\"")],
                nested,
            ),
            Part::png("https://example.com/dot.png"),
        ]);

        let mhtml = parse(&archive);

        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/rich"));
        assert_eq!(text_of(&mhtml, "https://example.com/plain"), "plain");
        assert!(mhtml.resources.contains("https://example.com/dot.png"));
        assert_eq!(mhtml.resources.len(), 3);
    }

    #[test]
    fn single_part_message() {
        let mhtml = parse(
            b"Subject: Note\r\n\
Content-Type: text/html; charset=utf-8\r\n\
Content-Location: https://example.com/note\r\n\
\r\n\
<p>Only part</p>\r\n",
        );

        assert_eq!(mhtml.resources.len(), 1);
        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/note"));
    }

    #[test]
    fn preamble_is_skipped() {
        let archive = "Content-Type: multipart/related; boundary=\"b\"\r\n\
\r\n\
This is a multi-part message in MIME format.\r\n\
--b\r\n\
Content-Type: text/html\r\n\
Content-Location: https://example.com/\r\n\
\r\n\
<p>Hi</p>\r\n\
--b--\r\n";

        let mhtml = parse(archive.as_bytes());

        assert_eq!(mhtml.resources.len(), 1);
        assert_eq!(text_of(&mhtml, "https://example.com/"), "<p>Hi</p>");
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
    use crate::common::{build_archive, Part, BOUNDARY};
    use mhtml_to_html::core::{mhtml_to_html, MhtmlOptions};
    use mhtml_to_html::parsers::mhtml::headers::get_boundary;
    use mhtml_to_html::parsers::mhtml::{parse, ResourceData};

    #[test]
    fn empty_input() {
        let mhtml = parse(b"");

        assert!(mhtml.resources.is_empty());
        assert!(mhtml.index.is_none());
    }

    #[test]
    fn missing_closing_delimiter() {
        let mut archive = build_archive(&[
            Part::html("https://example.com/", "<p>a</p>"),
            Part::css("https://example.com/style.css", "p{}"),
        ]);
        let closing = format!("--{}--\r\n", BOUNDARY);
        archive.truncate(archive.len() - closing.len());

        let mhtml = parse(&archive);
        let key = mhtml.resources.find("https://example.com/style.css").unwrap();

        assert_eq!(mhtml.resources.len(), 2);
        assert_eq!(mhtml.resources.get(key).unwrap().data.as_text(), Some("p{}\r\n"));
    }

    #[test]
    fn single_part_with_empty_body() {
        let archive = b"Content-Type: text/html\r\nContent-Location: https://example.com/\r\n\r\n";

        let mhtml = parse(archive);
        let page = mhtml_to_html(archive, &MhtmlOptions::default()).unwrap();

        assert_eq!(mhtml.resources.len(), 1);
        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/"));
        assert!(page.data.contains("<link rel=\"canonical\" href=\"https://example.com/\">"));
    }

    #[test]
    fn last_part_with_one_byte_body_and_no_closing_delimiter() {
        let mut archive = build_archive(&[Part::css("https://example.com/style.css", "p{}")]);
        let closing = format!("--{}--\r\n", BOUNDARY);
        archive.truncate(archive.len() - closing.len());
        archive.extend_from_slice(
            format!(
                "--{}\r\nContent-Type: text/html\r\nContent-Location: https://example.com/\r\n\r\nx",
                BOUNDARY
            )
            .as_bytes(),
        );

        let mhtml = parse(&archive);
        let key = mhtml.index_key().unwrap();

        assert_eq!(mhtml.resources.len(), 2);
        assert_eq!(mhtml.index.as_deref(), Some("https://example.com/"));
        assert_eq!(mhtml.resources.get(key).unwrap().data.as_text(), Some("x"));
    }

    #[test]
    fn invalid_base64_is_kept_raw() {
        let archive = build_archive(&[Part::new(
            &[
                ("Content-Type", "image/png"),
                ("Content-Transfer-Encoding", "base64"),
                ("Content-Location", "https://example.com/broken.png"),
            ],
            "not*base64",
        )]);

        let mhtml = parse(&archive);
        let key = mhtml.resources.find("https://example.com/broken.png").unwrap();

        assert_eq!(
            mhtml.resources.get(key).unwrap().data,
            ResourceData::Binary(b"not*base64".to_vec())
        );
    }

    #[test]
    fn content_type_without_boundary() {
        assert_eq!(get_boundary("multipart/related; type=\"text/html\""), None);
        assert_eq!(get_boundary("multipart/related; boundary=\"\""), None);
    }
}
