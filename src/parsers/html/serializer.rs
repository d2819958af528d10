use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};
use tracing::warn;

/// Serializes a DOM back into an HTML string
pub fn serialize_document(dom: &RcDom) -> String {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.clone().into();
    if let Err(err) = serialize(&mut buf, &serializable, SerializeOpts::default()) {
        warn!(%err, "unable to serialize DOM, output may be truncated");
    }

    match String::from_utf8(buf) {
        Ok(html) => html,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
