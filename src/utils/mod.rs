pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    css_base_name, is_remote_reference, numbered_path, page_mirror_path, parse_remote_url,
    strip_query, stylesheet_mirror_path,
};
