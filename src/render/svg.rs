//! SVG generation
//!
//! Markup is assembled as strings. Attribute order is insertion order so the
//! output is byte-for-byte reproducible.

use crate::types::Size;

use super::context::Metadata;
use super::types::Attrs;

/// Format a number with at most `precision` decimals, trailing zeros trimmed.
pub fn fmt_num(value: f64, precision: usize) -> String {
    let s = format!("{:.prec$}", value, prec = precision);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    // "-0.001" rounds to "-0"
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn write_attrs(out: &mut String, attrs: &Attrs) {
    for (key, value) in attrs.iter() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_xml(value));
        out.push('"');
    }
}

/// `<tag attrs/>` or `<tag attrs>inner</tag>`
pub fn element(tag: &str, attrs: &Attrs, inner: Option<&str>) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(tag);
    write_attrs(&mut out, attrs);
    match inner {
        None => out.push_str("/>"),
        Some(inner) => {
            out.push('>');
            out.push_str(inner);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
    out
}

/// Wrap rendered root markup in an `<svg>` document.
pub fn document(size: Size, meta: &Metadata, body: &str, precision: usize) -> String {
    let (w, h) = (fmt_num(size.w, precision), fmt_num(size.h, precision));
    let mut attrs = Attrs::new();
    attrs.set("viewBox", format!("0 0 {} {}", w, h));
    attrs.set("width", w);
    attrs.set("height", h);
    attrs.set("xmlns", "http://www.w3.org/2000/svg");
    attrs.set("stroke", super::defaults::STROKE);
    attrs.set("fill", super::defaults::FILL);

    let mut inner = String::from("\n");
    if !meta.defs().is_empty() {
        inner.push_str("<defs>\n");
        for def in meta.defs() {
            inner.push_str(def);
            inner.push('\n');
        }
        inner.push_str("</defs>\n");
    }
    inner.push_str(body);
    inner.push('\n');

    let mut out = element("svg", &attrs, Some(&inner));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(1.0, 2), "1");
        assert_eq!(fmt_num(1.5, 2), "1.5");
        assert_eq!(fmt_num(1.23456, 2), "1.23");
        assert_eq!(fmt_num(100.0, 0), "100");
        assert_eq!(fmt_num(-0.001, 2), "0");
        assert_eq!(fmt_num(-2.5, 3), "-2.5");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn empty_and_open_elements() {
        let mut attrs = Attrs::new();
        attrs.set("x", "1");
        assert_eq!(element("rect", &attrs, None), r#"<rect x="1"/>"#);
        assert_eq!(element("g", &Attrs::new(), Some("hi")), "<g>hi</g>");
    }

    #[test]
    fn document_with_defs() {
        let mut meta = Metadata::new();
        meta.define("<clipPath id=\"clip-0\"/>".to_string());
        let svg = document(Size::new(10.0, 20.0), &meta, "<g/>", 2);
        insta::assert_snapshot!(svg.trim_end(), @r#"
        <svg viewBox="0 0 10 20" width="10" height="20" xmlns="http://www.w3.org/2000/svg" stroke="black" fill="none">
        <defs>
        <clipPath id="clip-0"/>
        </defs>
        <g/>
        </svg>
        "#);
    }
}
