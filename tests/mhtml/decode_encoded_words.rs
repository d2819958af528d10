//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use mhtml_to_html::core::{mhtml_to_html, MhtmlOptions};
    use mhtml_to_html::parsers::mhtml::decode_encoded_words;

    #[test]
    fn base64_word() {
        assert_eq!(decode_encoded_words("=?utf-8?B?0J/RgNC40LLQtdGC?="), "Привет");
    }

    #[test]
    fn q_word_with_underscores() {
        assert_eq!(
            decode_encoded_words("=?ISO-8859-1?Q?Andr=E9_Pirard?="),
            "André Pirard"
        );
    }

    #[test]
    fn subject_reaches_page_info() {
        let archive = b"From: <Saved by Blink>\r\n\
Subject: =?utf-8?Q?Caf=C3=A9?= menu\r\n\
Content-Type: multipart/related; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: text/html\r\n\
Content-Location: https://example.com/menu\r\n\
\r\n\
<html><head></head><body></body></html>\r\n\
--b--\r\n";

        let html = mhtml_to_html(archive, &MhtmlOptions::default()).unwrap().data;

        assert!(html.contains("\"name\": \"Café menu\""));
        assert!(!html.contains("dateCreated"));
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
    use mhtml_to_html::parsers::mhtml::decode_encoded_words;

    #[test]
    fn unknown_encoding_is_kept() {
        assert_eq!(decode_encoded_words("=?utf-8?X?abc?="), "=?utf-8?X?abc?=");
    }

    #[test]
    fn unterminated_word_is_kept() {
        assert_eq!(decode_encoded_words("=?utf-8?B?abc"), "=?utf-8?B?abc");
    }
}
