use std::fmt::Write;

use genui_config::page::PageConfig;
use serde_json::Value;

const REGION_CLASS: &str = "bg-white p-8 rounded-lg shadow-lg w-full max-w-2xl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Submit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Submit => "submit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerAction {
    PreventDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub event: EventKind,
    /// Registered for the capture phase
    pub capture: bool,
    pub action: ListenerAction,
}

impl Listener {
    /// Capturing listener stopping form submissions from navigating away
    pub fn suppress_submit() -> Self {
        Self {
            event: EventKind::Submit,
            capture: true,
            action: ListenerAction::PreventDefault,
        }
    }

    fn registration_script(&self, region_id: &str) -> String {
        let body = match self.action {
            ListenerAction::PreventDefault => "event.preventDefault();",
        };
        format!(
            "document.getElementById({}).addEventListener({}, function (event) {{ {body} }}, {});",
            Value::from(region_id),
            Value::from(self.event.as_str()),
            self.capture
        )
    }
}

/// Listeners attached to one incarnation of the output region.
/// Replacing the region drops the registry with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn add(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.listeners.iter()
    }

    pub fn count(&self, event: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.event == event).count()
    }
}

/// The single element the pipeline owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    id: String,
    class: String,
    generation: u64,
    html: String,
    listeners: ListenerRegistry,
}

impl Region {
    fn new(id: &str) -> Self {
        Self {
            id: id.into(),
            class: REGION_CLASS.into(),
            generation: 0,
            html: String::new(),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Empty region with the same id and attributes, nothing else carried over
    fn successor(&self) -> Self {
        Self {
            id: self.id.clone(),
            class: self.class.clone(),
            generation: self.generation + 1,
            html: String::new(),
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of times the region has been replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    pub(crate) fn set_html(&mut self, html: String) {
        self.html = html;
    }
}

/// A `<script>` element appended to the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptElement {
    /// Position among all scripts ever appended to this page
    pub sequence: usize,
    /// Generation of the region whose markup this script belongs to
    pub generation: u64,
    pub text: String,
}

/// In-memory host document: head assets, the output region and the
/// scripts appended to the body
#[derive(Debug, Clone)]
pub struct HostPage {
    title: String,
    head_assets: Vec<String>,
    base_url: String,
    region: Region,
    scripts: Vec<ScriptElement>,
    next_sequence: usize,
}

impl HostPage {
    /// `base_url` is published to generated code as the global `url`
    pub fn new(cfg: &PageConfig, base_url: impl Into<String>) -> Self {
        Self {
            title: cfg.title.clone(),
            head_assets: cfg.head_assets.clone(),
            base_url: base_url.into(),
            region: Region::new(&cfg.region_id),
            scripts: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Scripts of the current region generation
    pub fn scripts(&self) -> &[ScriptElement] {
        &self.scripts
    }

    /// Swaps the region for its empty successor and returns it. The scripts
    /// of the superseded region are dropped with it.
    pub(crate) fn replace_region(&mut self) -> &mut Region {
        self.region = self.region.successor();
        self.scripts.clear();
        &mut self.region
    }

    pub(crate) fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    pub(crate) fn append_script(&mut self, text: &str) -> &ScriptElement {
        let at = self.scripts.len();
        self.scripts.push(ScriptElement {
            sequence: self.next_sequence,
            generation: self.region.generation,
            text: text.to_string(),
        });
        self.next_sequence += 1;
        &self.scripts[at]
    }

    /// Dispatches a submit event inside the region. Returns `true` when a
    /// listener prevented the default navigation.
    pub fn dispatch_submit(&self) -> bool {
        self.region
            .listeners
            .iter()
            .any(|l| l.event == EventKind::Submit && l.action == ListenerAction::PreventDefault)
    }

    /// Serializes the complete document
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        let _ = writeln!(out, "<title>{}</title>", escape_html(&self.title));
        for asset in &self.head_assets {
            let _ = writeln!(out, "{asset}");
        }
        let _ = writeln!(out, "<script>const url = {};</script>", Value::from(self.base_url.as_str()));
        out.push_str("</head>\n");
        out.push_str(
            "<body class=\"bg-gray-100 min-h-screen flex items-center justify-center p-4\">\n",
        );
        let _ = writeln!(
            out,
            "<div id=\"{}\" class=\"{}\">{}</div>",
            escape_html(&self.region.id),
            self.region.class,
            self.region.html
        );
        for listener in self.region.listeners.iter() {
            let _ = writeln!(
                out,
                "<script>{}</script>",
                listener.registration_script(&self.region.id)
            );
        }
        for script in &self.scripts {
            let _ = writeln!(out, "<script type=\"text/javascript\">{}</script>", script.text);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
