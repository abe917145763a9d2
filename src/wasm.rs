//! JS bindings for the content script.

use wasm_bindgen::prelude::*;

use crate::config::HighlightConfig;
use crate::dispatch::{decode, Command, CommandDispatcher, Reply};
use crate::highlight::WebTree;

/// Page-attached highlighter; one per document.
///
/// ```javascript,ignore
/// import init, { PageHighlighter } from 'findcore';
///
/// await init();
/// const highlighter = new PageHighlighter({ fuzzyByDefault: true });
///
/// chrome.runtime.onMessage.addListener((message, _sender, sendResponse) => {
///   const reply = highlighter.handleMessage(message);
///   if (reply !== undefined) sendResponse(reply);
/// });
/// ```
#[wasm_bindgen]
pub struct PageHighlighter {
    dispatcher: CommandDispatcher<WebTree>,
}

#[wasm_bindgen]
impl PageHighlighter {
    /// # Arguments
    /// * `config` - Optional configuration object (camelCase fields)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<PageHighlighter, JsValue> {
        let config: HighlightConfig = if config.is_null() || config.is_undefined() {
            HighlightConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let level = config.level_filter().map_err(|e| JsValue::from_str(&e.to_string()))?;
        crate::logging::init(level);

        let tree = WebTree::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { dispatcher: CommandDispatcher::new(tree, config) })
    }

    /// Handle one extension message.
    ///
    /// Returns the `SEARCH_RESULTS` reply, or `undefined` for messages this
    /// highlighter does not understand.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, message: JsValue) -> JsValue {
        let message: serde_json::Value = match serde_wasm_bindgen::from_value(message) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("Ignoring non-object message: {}", e);
                return JsValue::UNDEFINED;
            }
        };
        match decode(message) {
            Some(command) => self.run(command),
            None => JsValue::UNDEFINED,
        }
    }

    /// Highlight `query`; `threshold` may be omitted.
    #[wasm_bindgen]
    pub fn highlight(&mut self, query: String, is_regex: bool, threshold: Option<f64>) -> JsValue {
        self.run(Command::HighlightText { query, is_regex, threshold, mode: None })
    }

    #[wasm_bindgen]
    pub fn next(&mut self) -> JsValue {
        self.run(Command::NavigateNext)
    }

    #[wasm_bindgen]
    pub fn previous(&mut self) -> JsValue {
        self.run(Command::NavigatePrevious)
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) -> JsValue {
        self.run(Command::ClearHighlights)
    }

    #[wasm_bindgen(getter)]
    pub fn total(&self) -> usize {
        self.dispatcher.engine().summary().total
    }

    #[wasm_bindgen(getter, js_name = activeIndex)]
    pub fn active_index(&self) -> i32 {
        self.dispatcher.engine().summary().active_index as i32
    }

    fn run(&mut self, command: Command) -> JsValue {
        let kind = command.kind();
        let t0 = js_sys::Date::now();
        let reply = self.dispatcher.dispatch(command);
        log::debug!("{} -> {} matches in {:.1}ms", kind, reply.total, js_sys::Date::now() - t0);
        to_js(&reply)
    }
}

fn to_js(reply: &Reply) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match serde::Serialize::serialize(reply, &serializer) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Reply serialization failed: {}", e);
            JsValue::UNDEFINED
        }
    }
}
