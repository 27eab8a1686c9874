//! Template rendering for portfolio deployments.
//!
//! Templates are plain HTML documents carrying a lightweight placeholder
//! syntax: `{{path.to.field}}` variables, `{{#each list}}...{{/each}}`
//! blocks and `{{#if cond}}...{{/if}}` blocks, nestable. The interpreter
//! walks a `serde_json::Value` context; a missing field renders as an
//! empty string, never as an error, so partial profiles always produce a
//! page. A template that fails to parse degrades to a deterministic
//! minimal document instead of failing the build.

use serde_json::Value;

/// Owner-supplied overrides injected after variable substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Customizations<'a> {
    pub custom_css: Option<&'a str>,
    pub custom_js: Option<&'a str>,
    pub analytics_id: Option<&'a str>,
}

/// Render result. `degraded` carries the reason when the fallback document
/// was substituted for a broken template; the build keeps going and flags
/// it in the build log.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub degraded: Option<String>,
}

const FALLBACK_DOCUMENT: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>Portfolio</title>\n</head>\n<body>\n</body>\n</html>\n";

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Var(Vec<String>),
    Each(Vec<String>, Vec<Node>),
    If(Vec<String>, Vec<Node>),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> Result<Vec<Node>, String> {
        let nodes = self.parse_nodes(None)?;
        Ok(nodes)
    }

    /// Parse until the closing tag `until` (e.g. `/each`), or until the end
    /// of input at the top level.
    fn parse_nodes(&mut self, until: Option<&str>) -> Result<Vec<Node>, String> {
        let mut nodes = Vec::new();
        loop {
            let rest = &self.src[self.pos..];
            let Some(open) = rest.find("{{") else {
                if let Some(tag) = until {
                    return Err(format!("unclosed block: missing {{{{{}}}}}", tag));
                }
                if !rest.is_empty() {
                    nodes.push(Node::Text(rest.to_string()));
                }
                self.pos = self.src.len();
                return Ok(nodes);
            };
            if open > 0 {
                nodes.push(Node::Text(rest[..open].to_string()));
            }
            let after_open = open + 2;
            let Some(close) = rest[after_open..].find("}}") else {
                return Err("unterminated placeholder".to_string());
            };
            let tag = rest[after_open..after_open + close].trim().to_string();
            self.pos += after_open + close + 2;

            if let Some(closing) = tag.strip_prefix('/') {
                match until {
                    Some(expected) if expected == format!("/{}", closing) => return Ok(nodes),
                    _ => return Err(format!("unexpected closing tag {{{{/{}}}}}", closing)),
                }
            } else if let Some(path) = tag.strip_prefix("#each") {
                let path = parse_path(path)?;
                let body = self.parse_nodes(Some("/each"))?;
                nodes.push(Node::Each(path, body));
            } else if let Some(path) = tag.strip_prefix("#if") {
                let path = parse_path(path)?;
                let body = self.parse_nodes(Some("/if"))?;
                nodes.push(Node::If(path, body));
            } else if tag.starts_with('#') {
                return Err(format!("unknown block helper {{{{{}}}}}", tag));
            } else {
                nodes.push(Node::Var(parse_path(&tag)?));
            }
        }
    }
}

fn parse_path(raw: &str) -> Result<Vec<String>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("empty placeholder path".to_string());
    }
    Ok(raw.split('.').map(|s| s.trim().to_string()).collect())
}

/// Dotted-path lookup. `this` addresses the current scope itself.
fn lookup<'v>(scope: &'v Value, path: &[String]) -> Option<&'v Value> {
    let mut current = scope;
    for (i, segment) in path.iter().enumerate() {
        if i == 0 && segment == "this" {
            continue;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !matches!(item, Value::Array(_) | Value::Object(_)))
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => String::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn eval(nodes: &[Node], scope: &Value, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => {
                if let Some(value) = lookup(scope, path) {
                    out.push_str(&value_to_string(value));
                }
            }
            Node::Each(path, body) => {
                if let Some(Value::Array(items)) = lookup(scope, path) {
                    for item in items {
                        eval(body, item, out);
                    }
                }
            }
            Node::If(path, body) => {
                if lookup(scope, path).map(is_truthy).unwrap_or(false) {
                    eval(body, scope, out);
                }
            }
        }
    }
}

/// The template renderer. Pure and synchronous; all I/O happens around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Substitute placeholders from `context`, then apply customizations
    /// as a second pass. Never fails: a broken template yields the
    /// fallback document with the reason reported in `degraded`.
    pub fn render(
        &self,
        template: &str,
        context: &Value,
        customizations: &Customizations<'_>,
    ) -> Rendered {
        let (html, degraded) = match Parser::new(template).parse() {
            Ok(nodes) => {
                let mut out = String::with_capacity(template.len());
                eval(&nodes, context, &mut out);
                (out, None)
            }
            Err(reason) => (FALLBACK_DOCUMENT.to_string(), Some(reason)),
        };
        Rendered {
            html: apply_customizations(html, customizations),
            degraded,
        }
    }

    /// The deterministic shell used when rendering degrades.
    pub fn fallback_document() -> &'static str {
        FALLBACK_DOCUMENT
    }
}

fn apply_customizations(mut html: String, customizations: &Customizations<'_>) -> String {
    if let Some(css) = non_blank(customizations.custom_css) {
        let block = format!("<style type=\"text/css\">\n{}\n</style>", css);
        match html.find("</head>") {
            Some(idx) => html.insert_str(idx, &block),
            None => html.insert_str(0, &block),
        }
    }
    if let Some(js) = non_blank(customizations.custom_js) {
        let block = format!("<script type=\"text/javascript\">\n{}\n</script>", js);
        insert_before_body_close(&mut html, &block);
    }
    if let Some(analytics_id) = non_blank(customizations.analytics_id) {
        let block = analytics_snippet(analytics_id);
        insert_before_body_close(&mut html, &block);
    }
    html
}

fn insert_before_body_close(html: &mut String, block: &str) {
    match html.rfind("</body>") {
        Some(idx) => html.insert_str(idx, block),
        None => html.push_str(block),
    }
}

fn analytics_snippet(analytics_id: &str) -> String {
    format!(
        "<!-- Analytics -->\n<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n<script>\n  window.dataLayer = window.dataLayer || [];\n  function gtag(){{dataLayer.push(arguments);}}\n  gtag('js', new Date());\n  gtag('config', '{id}');\n</script>\n",
        id = analytics_id
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, context: &Value) -> String {
        Renderer::new()
            .render(template, context, &Customizations::default())
            .html
    }

    #[test]
    fn substitutes_simple_variables() {
        let ctx = json!({"name": "Alice Smith", "profession": "Engineer"});
        assert_eq!(
            render("<h1>{{name}}</h1><p>{{profession}}</p>", &ctx),
            "<h1>Alice Smith</h1><p>Engineer</p>"
        );
    }

    #[test]
    fn missing_variables_render_empty() {
        let ctx = json!({});
        assert_eq!(render("<h1>{{name}}</h1>", &ctx), "<h1></h1>");
    }

    #[test]
    fn dotted_paths_walk_nested_objects() {
        let ctx = json!({"profile": {"bio": "hi there"}});
        assert_eq!(render("{{profile.bio}}", &ctx), "hi there");
    }

    #[test]
    fn each_iterates_and_this_prints_item() {
        let ctx = json!({"skills": ["Rust", "SQL"]});
        assert_eq!(
            render("{{#each skills}}<li>{{this}}</li>{{/each}}", &ctx),
            "<li>Rust</li><li>SQL</li>"
        );
    }

    #[test]
    fn each_over_objects_scopes_fields() {
        let ctx = json!({"projects": [{"name": "one"}, {"name": "two"}]});
        assert_eq!(
            render("{{#each projects}}{{name}};{{/each}}", &ctx),
            "one;two;"
        );
    }

    #[test]
    fn if_blocks_respect_truthiness() {
        let ctx = json!({"github": "https://github.com/alice", "twitter": ""});
        let template = "{{#if github}}<a>gh</a>{{/if}}{{#if twitter}}<a>tw</a>{{/if}}";
        assert_eq!(render(template, &ctx), "<a>gh</a>");
    }

    #[test]
    fn nested_blocks() {
        let ctx = json!({"projects": [{"name": "p", "tags": ["a", "b"]}]});
        let template = "{{#each projects}}{{name}}:{{#each tags}}[{{this}}]{{/each}}{{/each}}";
        assert_eq!(render(template, &ctx), "p:[a][b]");
    }

    #[test]
    fn scalar_array_variable_joins_with_comma() {
        let ctx = json!({"skills": ["Rust", "SQL"]});
        assert_eq!(render("{{skills}}", &ctx), "Rust, SQL");
    }

    #[test]
    fn unclosed_block_degrades_to_fallback() {
        let ctx = json!({});
        let rendered =
            Renderer::new().render("{{#each items}}<li>", &ctx, &Customizations::default());
        assert!(rendered.degraded.is_some());
        assert!(rendered.html.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn plain_template_passes_through_untouched() {
        let template = "<html><head></head><body><h1>static</h1></body></html>";
        assert_eq!(render(template, &json!({})), template);
    }

    #[test]
    fn custom_css_lands_before_head_close() {
        let customizations = Customizations {
            custom_css: Some("body { color: red; }"),
            ..Default::default()
        };
        let rendered = Renderer::new().render(
            "<html><head></head><body></body></html>",
            &json!({}),
            &customizations,
        );
        let head_close = rendered.html.find("</head>").unwrap();
        let style = rendered.html.find("<style").unwrap();
        assert!(style < head_close);
    }

    #[test]
    fn custom_js_and_analytics_land_before_body_close() {
        let customizations = Customizations {
            custom_js: Some("console.log('hi');"),
            analytics_id: Some("G-TEST42"),
            ..Default::default()
        };
        let rendered = Renderer::new().render(
            "<html><head></head><body></body></html>",
            &json!({}),
            &customizations,
        );
        let body_close = rendered.html.rfind("</body>").unwrap();
        let script = rendered.html.find("console.log").unwrap();
        let analytics = rendered.html.find("G-TEST42").unwrap();
        assert!(script < analytics);
        assert!(analytics < body_close);
    }

    #[test]
    fn css_prepended_when_no_head_exists() {
        let customizations = Customizations {
            custom_css: Some(".x{}"),
            ..Default::default()
        };
        let rendered = Renderer::new().render("<div></div>", &json!({}), &customizations);
        assert!(rendered.html.starts_with("<style"));
    }
}
