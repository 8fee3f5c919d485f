//! Browser entry points for the country globe.
//!
//! The host page owns the renderer. It feeds pointer and resize events in,
//! calls `advance_frame` once per frame, and mirrors the geometry and color
//! updates exported here onto its own scene objects.

mod app;
mod config;
mod dom;

pub use app::{AppError, GlobeApp, PickReport, ShapeGeometry};
pub use config::{ConfigError, GlobeConfig};
pub use dom::DomLabel;

use std::cell::RefCell;

use foundation::math::Vec3;
use scene::ColorCommand;
use scene::components::BoundaryKind;
use scene::entity::ShapeId;
use tracing::error;
use wasm_bindgen::prelude::*;

const BUNDLED_COUNTRIES: &str = include_str!("../assets/countries.geo.json");

thread_local! {
    static STATE: RefCell<Option<GlobeApp<DomLabel>>> = const { RefCell::new(None) };
}

/// Runs `f` against the live session; before `init` (or on teardown) returns the default.
fn with_app<F, R>(f: F) -> R
where
    F: FnOnce(&mut GlobeApp<DomLabel>) -> R,
    R: Default,
{
    STATE
        .try_with(|state| state.borrow_mut().as_mut().map(f).unwrap_or_default())
        .unwrap_or_default()
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    error!(%err, "globe init failed");
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Builds the globe from `geojson` (the bundled dataset when absent) and an
/// optional JSON config. Replaces any previous session.
#[wasm_bindgen]
pub fn init(geojson: Option<String>, config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => GlobeConfig::from_json_str(json).map_err(to_js_error)?,
        _ => GlobeConfig::default(),
    };
    let label = DomLabel::attach(&config.label.element_id);
    let payload = geojson.as_deref().unwrap_or(BUNDLED_COUNTRIES);
    let app = GlobeApp::from_geojson(payload, &config, label).map_err(to_js_error)?;

    STATE.with(|state| *state.borrow_mut() = Some(app));
    Ok(())
}

#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) {
    with_app(|app| {
        app.pointer_move(x_px, y_px);
    });
}

#[wasm_bindgen]
pub fn pointer_down(x_px: f64, y_px: f64) {
    with_app(|app| app.pointer_down(x_px, y_px));
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_app(|app| app.pointer_up());
}

#[wasm_bindgen]
pub fn pointer_leave() {
    with_app(|app| {
        app.pointer_leave();
    });
}

#[wasm_bindgen]
pub fn resize(width_px: f64, height_px: f64) {
    with_app(|app| app.resize(width_px, height_px));
}

/// Host zoom changed. Returns the distance the picker uses after clamping,
/// for the host to write back into its own camera.
#[wasm_bindgen]
pub fn set_camera_distance(distance: f64) -> f64 {
    with_app(|app| app.set_camera_distance(distance))
}

/// Host orbit changed; the camera keeps looking at the globe center.
#[wasm_bindgen]
pub fn set_camera_position(x: f64, y: f64, z: f64) -> f64 {
    with_app(|app| app.set_camera_position(Vec3::new(x, y, z)))
}

/// Advances spin by one frame and returns the globe's Y rotation in radians.
#[wasm_bindgen]
pub fn advance_frame() -> f64 {
    with_app(|app| app.advance_frame())
}

#[wasm_bindgen]
pub fn globe_rotation() -> f64 {
    with_app(|app| app.rotation())
}

/// Pending color changes as `[shape, r, g, b, a]` records.
#[wasm_bindgen]
pub fn take_color_updates() -> js_sys::Float32Array {
    let updates = with_app(|app| flatten_color_commands(&app.take_color_updates()));
    js_sys::Float32Array::from(updates.as_slice())
}

#[wasm_bindgen]
pub fn shape_count() -> u32 {
    with_app(|app| app.world().len() as u32)
}

/// `"outline"` or `"filled"`.
#[wasm_bindgen]
pub fn shape_kind(index: u32) -> Option<String> {
    with_app(|app| {
        app.world()
            .shape(ShapeId::new(index))
            .map(|shape| kind_name(shape.kind()).to_string())
    })
}

#[wasm_bindgen]
pub fn shape_country(index: u32) -> Option<String> {
    with_app(|app| app.world().country(ShapeId::new(index)).map(str::to_owned))
}

#[wasm_bindgen]
pub fn shape_positions(index: u32) -> js_sys::Float64Array {
    let positions = with_app(|app| {
        app.shape_geometry(ShapeId::new(index))
            .map(|g| g.positions)
            .unwrap_or_default()
    });
    js_sys::Float64Array::from(positions.as_slice())
}

#[wasm_bindgen]
pub fn shape_indices(index: u32) -> js_sys::Uint32Array {
    let indices = with_app(|app| {
        app.shape_geometry(ShapeId::new(index))
            .map(|g| g.indices)
            .unwrap_or_default()
    });
    js_sys::Uint32Array::from(indices.as_slice())
}

/// `{ country, lat, lon }` under the pointer, or `null`.
#[wasm_bindgen]
pub fn pick_at(x_px: f64, y_px: f64) -> Result<JsValue, JsValue> {
    let Some(report) = with_app(|app| app.pick_at(x_px, y_px)) else {
        return Ok(JsValue::NULL);
    };
    let out = js_sys::Object::new();
    js_sys::Reflect::set(
        &out,
        &JsValue::from_str("country"),
        &JsValue::from_str(&report.country),
    )?;
    js_sys::Reflect::set(
        &out,
        &JsValue::from_str("lat"),
        &JsValue::from_f64(report.lat_deg),
    )?;
    js_sys::Reflect::set(
        &out,
        &JsValue::from_str("lon"),
        &JsValue::from_f64(report.lon_deg),
    )?;
    Ok(out.into())
}

#[wasm_bindgen]
pub fn highlighted_country() -> Option<String> {
    with_app(|app| app.highlighted_country().map(str::to_owned))
}

fn kind_name(kind: BoundaryKind) -> &'static str {
    match kind {
        BoundaryKind::Outline => "outline",
        BoundaryKind::Filled => "filled",
    }
}

fn flatten_color_commands(commands: &[ColorCommand]) -> Vec<f32> {
    commands
        .iter()
        .flat_map(|c| {
            let [r, g, b, a] = c.color.rgba();
            [c.shape.index() as f32, r, g, b, a]
        })
        .collect()
}
