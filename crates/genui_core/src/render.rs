use std::{
    fmt::{Display, Write},
    time::Duration,
};

use tracing::{debug, warn};

use crate::page::{HostPage, Listener, ScriptElement, escape_html};

const LOADING_HTML: &str = r#"<div class="flex flex-col items-center justify-center h-full text-center py-10">
<div class="border-4 border-gray-200 border-t-blue-500 rounded-full w-12 h-12 animate-[spin_1s_linear_infinite]"></div>
<p class="mt-4 text-gray-700">Compiling frontend... <span id="compile-time" class="font-mono text-sm"></span></p>
</div>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Loading,
    Rendered,
    Errored,
}

/// Receives each generated script once it is attached to the page, after
/// the markup it belongs to.
pub trait ScriptHost {
    /// # Errors
    ///
    /// A failing script is reported and does not stop the scripts after it.
    fn execute(&mut self, page: &HostPage, script: &ScriptElement) -> Result<(), String>;
}

/// Leaves execution to the browser that loads the serialized page, where the
/// appended `<script>` elements run in order after the region markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredScripts;

impl ScriptHost for DeferredScripts {
    fn execute(&mut self, _page: &HostPage, script: &ScriptElement) -> Result<(), String> {
        debug!(sequence = script.sequence, "Script deferred to page load");
        Ok(())
    }
}

/// Sole writer of the host page's output region
pub struct OutputRenderer<H: ScriptHost = DeferredScripts> {
    page: HostPage,
    host: H,
    state: RenderState,
}

impl OutputRenderer<DeferredScripts> {
    pub fn deferred(page: HostPage) -> Self {
        Self::new(page, DeferredScripts)
    }
}

impl<H: ScriptHost> OutputRenderer<H> {
    pub fn new(page: HostPage, host: H) -> Self {
        Self {
            page,
            host,
            state: RenderState::Idle,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn page(&self) -> &HostPage {
        &self.page
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_page(self) -> HostPage {
        self.page
    }

    /// Replaces the region with an empty successor, which drops every
    /// listener attached so far, then attaches the single submit guard and
    /// shows the loading indicator. Safe to call in any state.
    pub fn begin_loading(&mut self) {
        let region = self.page.replace_region();
        region.listeners_mut().add(Listener::suppress_submit());
        region.set_html(LOADING_HTML.to_string());

        debug!(generation = region.generation(), "Output region loading");
        self.state = RenderState::Loading;
    }

    /// Shows the compile time and markup, then appends and hands over each
    /// script in order.
    pub fn render_success(&mut self, markup: &str, scripts: &[String], elapsed: Duration) {
        let html = format!(
            "<div class=\"w-full\">\n<h2 class=\"text-lg text-gray-600 mb-4 text-center\">Compilation Time: <span class=\"font-bold text-blue-500\">{}</span></h2>\n{markup}\n</div>",
            format_elapsed(elapsed)
        );
        self.page.region_mut().set_html(html);

        for script in scripts {
            let element = self.page.append_script(script).clone();
            if let Err(e) = self.host.execute(&self.page, &element) {
                warn!(sequence = element.sequence, err = %e, "Generated script failed");
            }
        }

        debug!(scripts = scripts.len(), "Output region rendered");
        self.state = RenderState::Rendered;
    }

    /// Shows an error panel. Never fails, whatever `error`'s `Display` does.
    pub fn render_error(&mut self, error: &dyn Display) {
        let mut message = String::new();
        if write!(message, "{error}").is_err() || message.trim().is_empty() {
            message = "Unknown error".to_string();
        }

        let html = format!(
            "<div class=\"p-4 bg-red-100 rounded-lg text-red-700\">\n<p class=\"font-semibold\">Error:</p>\n<p>{}</p>\n</div>",
            escape_html(&message)
        );
        self.page.region_mut().set_html(html);
        self.state = RenderState::Errored;
    }
}

/// Seconds with two decimals, e.g. `1.23s`
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
