pub mod playback_url_utils;
