//! HTML serialization of the node tree.

use std::fmt::Write as _;

use super::Node;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "img"];

/// Escape text for safe embedding in HTML.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize one node (and its subtree) to HTML.
pub fn node_to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Serialize a node sequence to HTML.
pub fn nodes_to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

/// Wrap a rendered body in a minimal standalone HTML document.
///
/// Layout matches the print path: `preview-panel` > `preview-a4` >
/// `scenario-body`.
pub fn wrap_html_document(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"ja\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n<main class=\"preview-panel\"><div class=\"preview-a4\"><article class=\"scenario-body\">{}</article></div></main>\n</body>\n</html>",
        escape_html(title),
        body
    )
}

fn write_node(out: &mut String, node: &Node) {
    let _ = write!(out, "<{}", node.tag());
    let class = effective_class(node);
    if !class.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_html(&class));
    }
    if let Some(id) = node.id() {
        let _ = write!(out, " id=\"{}\"", escape_html(id));
    }
    for (name, value) in node.attrs() {
        let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
    }
    if VOID_TAGS.contains(&node.tag()) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    out.push_str(&escape_html(node.text()));
    for child in node.children() {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", node.tag());
}

fn effective_class(node: &Node) -> String {
    if node.class().is_empty() {
        String::new()
    } else if node.revealed() {
        format!("{} revealed", node.class())
    } else {
        node.class().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_covers_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_simple_node() {
        let node = Node::new("p", "paragraph").with_text("月下");
        assert_eq!(node_to_html(&node), "<p class=\"paragraph\">月下</p>");
    }

    #[test]
    fn test_node_with_id_and_children() {
        let node = Node::new("h2", "scene-title")
            .with_id("heading-0")
            .with_text("導入");
        assert_eq!(
            node_to_html(&node),
            "<h2 class=\"scene-title\" id=\"heading-0\">導入</h2>"
        );
    }

    #[test]
    fn test_void_tag_has_no_close() {
        assert_eq!(node_to_html(&Node::new("br", "")), "<br />");
    }

    #[test]
    fn test_img_src_attr() {
        let node = Node::new("img", "cover").with_attr("src", "cover.png");
        assert_eq!(
            node_to_html(&node),
            "<img class=\"cover\" src=\"cover.png\" />"
        );
    }

    #[test]
    fn test_revealed_secret_gains_class() {
        let mut node = Node::new("button", "secret").with_text("黒幕");
        assert_eq!(
            node_to_html(&node),
            "<button class=\"secret\">黒幕</button>"
        );
        node.toggle_reveal();
        assert_eq!(
            node_to_html(&node),
            "<button class=\"secret revealed\">黒幕</button>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let node = Node::new("p", "paragraph").with_text("<script>");
        assert_eq!(
            node_to_html(&node),
            "<p class=\"paragraph\">&lt;script&gt;</p>"
        );
    }

    #[test]
    fn test_wrap_html_document_structure() {
        let html = wrap_html_document("影の掟", "<p>body</p>");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>影の掟</title>"));
        assert!(html.contains("<article class=\"scenario-body\"><p>body</p></article>"));
    }
}
