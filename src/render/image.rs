use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Dimension token the recipe service serves the largest image for
pub const LARGE_IMAGE_SIZE: &str = "636x393";

// Whole digit runs on both sides; only three-by-three tokens are rewritten
static SIZE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)x(\d+)").expect("valid size token regex"));

static SUFFIX_SIZE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d+x\d+\.").expect("valid suffix size regex"));

/// Ask for the large rendition of a recipe image.
///
/// `.../foo-312x231.jpg` becomes `.../foo-636x393.jpg`; a `-WxH.` suffix with
/// other digit counts is rewritten too. URLs without a size token are
/// returned unchanged.
pub fn upscale_image_url(url: &str) -> String {
    let mut rewritten = false;
    let upscaled = SIZE_TOKEN.replace_all(url, |caps: &Captures| {
        if caps[1].len() == 3 && caps[2].len() == 3 {
            rewritten = true;
            LARGE_IMAGE_SIZE.to_string()
        } else {
            caps[0].to_string()
        }
    });

    if rewritten {
        upscaled.into_owned()
    } else if SUFFIX_SIZE_TOKEN.is_match(url) {
        SUFFIX_SIZE_TOKEN
            .replace_all(url, format!("-{}.", LARGE_IMAGE_SIZE).as_str())
            .into_owned()
    } else {
        url.to_string()
    }
}
