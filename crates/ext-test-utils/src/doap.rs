//! [`Doap`] builder for `doap.n3` graph descriptions.

/// Renders a graph description for one extension.
///
/// The extension subject and its private namespace live under
/// `https://example.org/<name>/doap.n3#`.
///
/// ```rust
/// use ext_test_utils::Doap;
///
/// let text = Doap::new("history")
///     .enabled(true)
///     .private("limit", "20")
///     .module("Default", &[("priority", "30")])
///     .render();
/// assert!(text.contains(":limit \"20\""));
/// ```
#[derive(Debug, Clone)]
pub struct Doap {
    name: String,
    enabled: Option<bool>,
    with_namespace: bool,
    statements: Vec<String>,
    modules: Vec<(String, Vec<(String, String)>)>,
    extra: Vec<String>,
}

impl Doap {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: None,
            with_namespace: true,
            statements: vec![format!("doap:name \"{name}\"")],
            modules: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// Declare `owconfig:enabled` as a boolean literal.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Omit `owconfig:privateNamespace`.
    pub fn without_namespace(mut self) -> Self {
        self.with_namespace = false;
        self
    }

    /// Omit `doap:name`.
    pub fn without_name(mut self) -> Self {
        self.statements.retain(|s| !s.starts_with("doap:name"));
        self
    }

    pub fn private(self, key: &str, value: &str) -> Self {
        self.statement(&format!(":{key} \"{value}\""))
    }

    pub fn templates(self, fragment: &str) -> Self {
        self.statement(&format!("owconfig:templates \"{fragment}\""))
    }

    pub fn languages(self, fragment: &str) -> Self {
        self.statement(&format!("owconfig:languages \"{fragment}\""))
    }

    pub fn helper_event(self, event: &str) -> Self {
        self.statement(&format!("owconfig:helperEvent \"{event}\""))
    }

    pub fn plugin_event(self, event: &str) -> Self {
        self.statement(&format!("owconfig:pluginEvent \"{event}\""))
    }

    /// Attach a module subject `:<name>` with `owconfig:` settings.
    pub fn module(mut self, name: &str, settings: &[(&str, &str)]) -> Self {
        self.modules.push((
            name.to_string(),
            settings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self
    }

    /// A raw predicate/object pair on the extension subject.
    pub fn statement(mut self, predicate_object: &str) -> Self {
        self.statements.push(predicate_object.to_string());
        self
    }

    /// Raw Turtle appended after the extension subject.
    pub fn raw(mut self, turtle: &str) -> Self {
        self.extra.push(turtle.to_string());
        self
    }

    pub fn namespace(&self) -> String {
        format!("https://example.org/{}/doap.n3#", self.name)
    }

    pub fn render(&self) -> String {
        let ns = self.namespace();
        let mut out = format!(
            "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
             @prefix doap: <http://usefulinc.com/ns/doap#> .\n\
             @prefix owconfig: <http://ns.ontowiki.net/SysOnt/ExtensionConfig/> .\n\
             @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
             @prefix : <{ns}> .\n\n\
             <> foaf:primaryTopic :{name} .\n\n",
            name = self.name,
        );

        let mut statements = vec!["a doap:Project".to_string()];
        if self.with_namespace {
            statements.push(format!("owconfig:privateNamespace <{ns}>"));
        }
        if let Some(enabled) = self.enabled {
            statements.push(format!("owconfig:enabled \"{enabled}\"^^xsd:boolean"));
        }
        statements.extend(self.statements.iter().cloned());
        if !self.modules.is_empty() {
            let modules: Vec<String> = self.modules.iter().map(|(m, _)| format!(":{m}")).collect();
            statements.push(format!("owconfig:hasModule {}", modules.join(", ")));
        }
        out.push_str(&format!(":{} {} .\n", self.name, statements.join(" ;\n  ")));

        for (module, settings) in &self.modules {
            out.push_str(&format!("\n:{module} a owconfig:Module"));
            for (key, value) in settings {
                out.push_str(&format!(" ;\n  owconfig:{key} \"{value}\""));
            }
            out.push_str(" .\n");
        }

        for turtle in &self.extra {
            out.push('\n');
            out.push_str(turtle);
            out.push('\n');
        }
        out
    }
}
