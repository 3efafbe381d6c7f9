use std::time::Duration;

const fn build_setting(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(value) => value,
        None => fallback,
    }
}

const RIG_HOST: &str = build_setting(option_env!("PICONTROL_HOST"), "localhost");
const RIG_PORT: u16 = const_str::parse!(build_setting(option_env!("PICONTROL_PORT"), "5000"), u16);
const RIG_SCHEME: &str = {
    let secure = build_setting(option_env!("PICONTROL_SECURE"), "false");
    if const_str::eq_ignore_ascii_case!(secure, "true") || const_str::equal!(secure, "1") {
        "https"
    } else {
        "http"
    }
};

/// Where the rig lives unless told otherwise, baked in at compile time
pub const DEFAULT_BASE_URL: &str = const_str::concat!(RIG_SCHEME, "://", RIG_HOST, ":", RIG_PORT);

/// Upper bound on any single request, kept below the fastest poll interval's default
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const UPDATE_HOTSPOT_PATH: &str = "/update_hotspot";
pub const HOTSPOT_INFO_PATH: &str = "/hotspot_info";
pub const DETECTION_STATUS_PATH: &str = "/detection_status";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const SET_SERVO_PATH: &str = "/set_servo";
pub const VIDEO_FEED_PATH: &str = "/video_feed";
