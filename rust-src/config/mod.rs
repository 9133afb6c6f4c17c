//! Configuration, constants and logging setup for popchart.

mod logging;
mod settings;

#[allow(unused_imports)]
pub use logging::{init_logging, LogTarget};
#[allow(unused_imports)]
pub use settings::{
    get_config_dir,
    get_log_path,
    get_settings_path,
    Settings,
    DEFAULT_CONTAINER_WIDTH,
    DEFAULT_DATA_FILE,
    DEFAULT_VISIBLE_COUNT,
    EARLY_YEARS,
    PNG_FILE_NAME,
    RECENT_YEARS,
    SVG_FILE_NAME,
};
