//! WebAssembly bindings
//!
//! Thin wrapper over [`LayoutEngine`] that speaks JSON strings, so the
//! browser side needs no generated types. Errors become JavaScript
//! exceptions.

use wasm_bindgen::prelude::*;

use crate::core::{CharacterSet, GraphInput, LayoutConfig, Point};
use crate::layout::{LayoutEngine, Relayout};
use crate::render::{LayoutView, PreviewRenderer, Renderer};

/// Install the panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// Browser handle to a layout engine
#[wasm_bindgen]
pub struct WasmLayoutEngine {
    engine: LayoutEngine,
}

#[wasm_bindgen]
impl WasmLayoutEngine {
    /// Create an engine; `config` is an optional LayoutConfig JSON document
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmLayoutEngine, JsValue> {
        let config = match config {
            Some(json) => LayoutConfig::from_json(&json).map_err(js_error)?,
            None => LayoutConfig::default(),
        };
        Ok(Self {
            engine: LayoutEngine::new(config),
        })
    }

    /// True when the graph document would trigger a full relayout
    #[wasm_bindgen(js_name = shouldRelayout)]
    pub fn should_relayout(&self, graph: &str) -> Result<bool, JsValue> {
        let input = GraphInput::from_json(graph).map_err(js_error)?;
        Ok(self.engine.should_relayout(&input))
    }

    /// Load a graph document; returns "cold" or "warm"
    #[wasm_bindgen(js_name = setGraph)]
    pub fn set_graph(&mut self, graph: &str) -> Result<String, JsValue> {
        let input = GraphInput::from_json(graph).map_err(js_error)?;
        Ok(match self.engine.set_graph(input) {
            Relayout::Cold => "cold".to_string(),
            Relayout::Warm => "warm".to_string(),
        })
    }

    /// One tick; returns a snapshot JSON or undefined once settled
    pub fn step(&mut self) -> Result<Option<String>, JsValue> {
        self.engine.step().map(|s| to_json(&s)).transpose()
    }

    pub fn run(&mut self, max_ticks: usize) -> Result<String, JsValue> {
        to_json(&self.engine.run(max_ticks))
    }

    pub fn positions(&self) -> Result<String, JsValue> {
        to_json(&self.engine.positions())
    }

    /// Levels keyed by node id, plus cut edges
    pub fn levels(&self) -> Result<String, JsValue> {
        to_json(&serde_json::json!({
            "levels": self.engine.levels().by_id(),
            "cutEdges": self.engine.cut_edges(),
        }))
    }

    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> bool {
        self.engine.is_settled()
    }

    #[wasm_bindgen(js_name = setFixed)]
    pub fn set_fixed(&mut self, id: &str, x: Option<f64>, y: Option<f64>) -> Result<(), JsValue> {
        let pin = x.zip(y).map(|(x, y)| Point::new(x, y));
        self.engine.set_fixed(id, pin).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setLayoutRoot)]
    pub fn set_layout_root(&mut self, id: Option<String>) -> Result<(), JsValue> {
        self.engine.set_layout_root(id.as_deref()).map_err(js_error)
    }

    pub fn reconfigure(&mut self, config: &str) -> Result<(), JsValue> {
        let config = LayoutConfig::from_json(config).map_err(js_error)?;
        self.engine.reconfigure(config);
        Ok(())
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&mut self, id: &str) -> Result<(), JsValue> {
        self.engine.begin_drag(id).map_err(js_error)
    }

    /// Returns the resolved position as `{x, y}` JSON
    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let point = self.engine.drag_to(id, Point::new(x, y)).map_err(js_error)?;
        to_json(&point)
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&mut self, id: &str) -> Result<String, JsValue> {
        let point = self.engine.end_drag(id).map_err(js_error)?;
        to_json(&point)
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Text preview of the current positions
    pub fn preview(&self, style: Option<String>) -> Result<String, JsValue> {
        let style = match style.as_deref() {
            None | Some("unicode") => CharacterSet::Unicode,
            Some("ascii") => CharacterSet::Ascii,
            Some(other) => return Err(js_error(format!("Unknown style: {}", other))),
        };
        PreviewRenderer::with_style(style)
            .render(&LayoutView::of_engine(&self.engine))
            .map_err(js_error)
    }
}
