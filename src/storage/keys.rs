use crate::media::detection::extension_for_mime;
use rand::Rng;
use rand::distr::Alphanumeric;

const SUFFIX_LEN: usize = 8;

/// `<unix-millis>-<random>.<ext>`. Collisions are unlikely, not impossible;
/// backends refuse to overwrite.
pub fn object_key(mime: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{millis}-{suffix}.{}", extension_for_mime(mime))
}
