pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod navigation;
pub mod render;
pub mod route;
pub mod services;
pub mod shell;

pub use app_services::AppServices;
pub use navigation::{Clipboard, MemoryClipboard, Navigation, OpenTarget, Osc52Clipboard};
pub use route::{Route, RouteError};
pub use shell::{Command, Shell};
