pub mod config;
pub mod cors;
pub mod error;
pub mod events;
pub mod file_system;
pub mod handlers;
pub mod models;
pub mod picker;
pub mod settings;
pub mod settings_handlers;
pub mod state;
pub mod terminal;
pub mod watcher;

use actix_web::web;

use crate::error::ApiError;

/// Registers every API route, plus extractor error handlers that answer
/// malformed requests with the usual failure envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .service(handlers::connect)
    .service(handlers::events)
    .service(handlers::read_directory)
    .service(handlers::read_directory_tree)
    .service(handlers::read_file)
    .service(handlers::read_file_binary)
    .service(handlers::write_file)
    .service(handlers::create_file)
    .service(handlers::file_exists)
    .service(handlers::directory_exists)
    .service(handlers::delete_file)
    .service(handlers::create_directory)
    .service(handlers::delete_directory)
    .service(handlers::rename_item)
    .service(handlers::select_directory)
    .service(handlers::get_app_path)
    .service(handlers::watch_directory)
    .service(handlers::unwatch_directory)
    .service(handlers::launch_external)
    .service(settings_handlers::get_settings)
    .service(settings_handlers::get_style)
    .service(settings_handlers::get_catalog)
    .service(settings_handlers::set_font_size)
    .service(settings_handlers::set_color_scheme_light)
    .service(settings_handlers::set_color_scheme_dark)
    .service(settings_handlers::set_dark_mode)
    .service(settings_handlers::set_terminal_window_mode)
    .service(settings_handlers::set_terminal_split_direction)
    .service(settings_handlers::set_terminal_show_split)
    .service(settings_handlers::set_terminal_window_width)
    .service(settings_handlers::set_terminal_window_height)
    .service(settings_handlers::current_theme)
    .service(settings_handlers::custom_themes)
    .service(settings_handlers::save_theme_slot)
    .service(settings_handlers::clear_theme_slot)
    .service(settings_handlers::set_theme_color);
}
