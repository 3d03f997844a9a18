//! Routes over the settings store. Every accepted visual change is followed
//! by a `style-applied` push carrying the updated document style.

use crate::error::ApiError;
use crate::events::PushEvent;
use crate::settings::{
    dimension_from_json, BuiltinScheme, FontSize, Palette, SettingsStore, SplitDirection,
    ThemeMode, ThemeSlot, WindowMode, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    WINDOW_HEIGHT_RANGE, WINDOW_WIDTH_RANGE,
};
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{json, Value};

type ApiResult = Result<HttpResponse, ApiError>;

#[derive(Deserialize)]
pub struct ValueRequest {
    pub value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSlotRequest {
    pub slot: String,
    pub name: String,
    pub light_colors: Palette,
    pub dark_colors: Palette,
}

#[derive(Deserialize)]
pub struct SlotRequest {
    pub slot: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetColorRequest {
    pub slot: String,
    pub mode: String,
    pub color_key: String,
    pub value: String,
}

/// Field setters reject silently, so the response reports whether the value
/// was taken alongside the resulting settings.
fn setting_response(store: &SettingsStore, applied: bool) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "applied": applied,
        "settings": store.snapshot(),
    }))
}

fn publish_style(state: &AppState, store: &SettingsStore) {
    state.publish(PushEvent::StyleApplied(store.document().clone()));
}

/// Runs a setter under the lock, pushing the new style when a visual field changed.
fn update(
    state: &AppState,
    name: &str,
    visual: bool,
    apply: impl FnOnce(&mut SettingsStore) -> bool,
) -> HttpResponse {
    let mut store = state.settings.lock();
    let applied = apply(&mut store);
    if applied {
        debug!("Setting '{}' updated", name);
        if visual {
            publish_style(state, &store);
        }
    } else {
        debug!("Setting '{}' rejected", name);
    }
    setting_response(&store, applied)
}

#[get("/api/settings")]
pub async fn get_settings(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.lock().snapshot())
}

#[get("/api/settings/style")]
pub async fn get_style(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.lock().document().clone())
}

/// Every legal value for each enumerated setting, with display labels.
#[get("/api/settings/catalog")]
pub async fn get_catalog() -> HttpResponse {
    let font_sizes: Vec<Value> = FontSize::ALL
        .iter()
        .map(|size| json!({ "value": size, "label": size.label(), "cssValue": size.css_value() }))
        .collect();
    let color_schemes: Vec<Value> = BuiltinScheme::ALL
        .iter()
        .map(|scheme| {
            json!({
                "value": scheme,
                "lightLabel": scheme.label(ThemeMode::Light),
                "darkLabel": scheme.label(ThemeMode::Dark),
            })
        })
        .collect();
    let window_modes: Vec<Value> = WindowMode::ALL
        .iter()
        .map(|mode| json!({ "value": mode, "label": mode.label() }))
        .collect();
    let split_directions: Vec<Value> = SplitDirection::ALL
        .iter()
        .map(|dir| json!({ "value": dir, "label": dir.label() }))
        .collect();

    HttpResponse::Ok().json(json!({
        "fontSizes": font_sizes,
        "colorSchemes": color_schemes,
        "themeSlots": ThemeSlot::ALL,
        "windowModes": window_modes,
        "splitDirections": split_directions,
        "windowWidth": {
            "min": WINDOW_WIDTH_RANGE.0,
            "max": WINDOW_WIDTH_RANGE.1,
            "default": DEFAULT_WINDOW_WIDTH,
        },
        "windowHeight": {
            "min": WINDOW_HEIGHT_RANGE.0,
            "max": WINDOW_HEIGHT_RANGE.1,
            "default": DEFAULT_WINDOW_HEIGHT,
        },
    }))
}

#[post("/api/settings/font-size")]
pub async fn set_font_size(state: web::Data<AppState>, req: web::Json<ValueRequest>) -> HttpResponse {
    update(&state, "fontSize", true, |s| {
        req.value.as_str().is_some_and(|v| s.set_font_size(v))
    })
}

#[post("/api/settings/color-scheme-light")]
pub async fn set_color_scheme_light(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    update(&state, "colorSchemeLight", true, |s| {
        req.value.as_str().is_some_and(|v| s.set_color_scheme_light(v))
    })
}

#[post("/api/settings/color-scheme-dark")]
pub async fn set_color_scheme_dark(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    update(&state, "colorSchemeDark", true, |s| {
        req.value.as_str().is_some_and(|v| s.set_color_scheme_dark(v))
    })
}

#[post("/api/settings/dark-mode")]
pub async fn set_dark_mode(state: web::Data<AppState>, req: web::Json<ValueRequest>) -> HttpResponse {
    update(&state, "darkMode", true, |s| {
        req.value.as_bool().is_some_and(|dark| s.set_dark_mode(dark))
    })
}

#[post("/api/settings/terminal-window-mode")]
pub async fn set_terminal_window_mode(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    update(&state, "terminalWindowMode", false, |s| {
        req.value.as_str().is_some_and(|v| s.set_terminal_window_mode(v))
    })
}

#[post("/api/settings/terminal-split-direction")]
pub async fn set_terminal_split_direction(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    update(&state, "terminalSplitDirection", false, |s| {
        req.value.as_str().is_some_and(|v| s.set_terminal_split_direction(v))
    })
}

#[post("/api/settings/terminal-show-split")]
pub async fn set_terminal_show_split(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    update(&state, "terminalShowSplit", false, |s| {
        req.value.as_bool().is_some_and(|show| s.set_terminal_show_split(show))
    })
}

/// Unparseable widths fall back to the default before clamping.
#[post("/api/settings/terminal-window-width")]
pub async fn set_terminal_window_width(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    let width = dimension_from_json(&req.value)
        .filter(|w| *w != 0)
        .unwrap_or(DEFAULT_WINDOW_WIDTH);
    update(&state, "terminalWindowWidth", false, |s| {
        s.set_terminal_window_width(width)
    })
}

#[post("/api/settings/terminal-window-height")]
pub async fn set_terminal_window_height(
    state: web::Data<AppState>,
    req: web::Json<ValueRequest>,
) -> HttpResponse {
    let height = dimension_from_json(&req.value)
        .filter(|h| *h != 0)
        .unwrap_or(DEFAULT_WINDOW_HEIGHT);
    update(&state, "terminalWindowHeight", false, |s| {
        s.set_terminal_window_height(height)
    })
}

#[get("/api/themes/current")]
pub async fn current_theme(state: web::Data<AppState>) -> HttpResponse {
    let store = state.settings.lock();
    HttpResponse::Ok().json(json!({
        "name": store.current_theme_name(),
        "colors": store.current_theme_colors(),
    }))
}

#[get("/api/themes/custom")]
pub async fn custom_themes(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.settings.lock().custom_themes())
}

#[post("/api/themes/save-slot")]
pub async fn save_theme_slot(
    state: web::Data<AppState>,
    req: web::Json<SaveSlotRequest>,
) -> ApiResult {
    let req = req.into_inner();
    let mut store = state.settings.lock();
    store.save_theme_to_slot(&req.slot, &req.name, req.light_colors, req.dark_colors)?;
    info!("Saved custom theme '{}' to {}", req.name.trim(), req.slot);
    publish_style(&state, &store);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[post("/api/themes/clear-slot")]
pub async fn clear_theme_slot(state: web::Data<AppState>, req: web::Json<SlotRequest>) -> ApiResult {
    let mut store = state.settings.lock();
    store.clear_theme_slot(&req.slot)?;
    info!("Cleared custom theme slot {}", req.slot);
    publish_style(&state, &store);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[post("/api/themes/set-color")]
pub async fn set_theme_color(
    state: web::Data<AppState>,
    req: web::Json<SetColorRequest>,
) -> HttpResponse {
    update(&state, "customThemeColor", true, |s| {
        s.set_custom_theme_color(&req.slot, &req.mode, &req.color_key, &req.value)
    })
}
