//! crates/floripedia_core/src/validation.rs
//!
//! Input preconditions checked before anything reaches the network.

/// Largest image accepted by image search.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const SITUATION_MIN_CHARS: usize = 10;
pub const SITUATION_MAX_CHARS: usize = 500;
pub const KEYWORD_MAX_CHARS: usize = 100;

/// Free-text situation for recommendations: 10 to 500 characters.
pub fn is_valid_situation(situation: &str) -> bool {
    let len = situation.chars().count();
    (SITUATION_MIN_CHARS..=SITUATION_MAX_CHARS).contains(&len)
}

/// Search keyword: 1 to 100 characters.
pub fn is_valid_search_keyword(keyword: &str) -> bool {
    let len = keyword.chars().count();
    (1..=KEYWORD_MAX_CHARS).contains(&len)
}

pub fn is_valid_image_size(image: &[u8]) -> bool {
    image.len() <= MAX_IMAGE_BYTES
}

/// JPEG (`FF D8 FF`) or PNG (`89 50 4E 47`) magic bytes.
pub fn is_valid_image_format(image: &[u8]) -> bool {
    if image.len() < 4 {
        return false;
    }
    let jpeg = image[..3] == [0xFF, 0xD8, 0xFF];
    let png = image[..4] == [0x89, 0x50, 0x4E, 0x47];
    jpeg || png
}

pub fn is_valid_blooming_month(month: u8) -> bool {
    (1..=12).contains(&month)
}
