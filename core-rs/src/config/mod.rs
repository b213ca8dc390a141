//! Console configuration

pub mod app_config;

pub use app_config::{
    ApiSettings, AppConfig, ModalSettings, SessionSettings, API_URL_ENV, CONFIG_FILE_NAME,
};
