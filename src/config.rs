use std::path::PathBuf;
use std::time::Duration;

/// Bundle-relative directory holding per-id card images (`/cards/<id>.jpg`).
pub const LOCAL_CARD_DIR: &str = "/cards";
pub const LOCAL_CARD_EXT: &str = "jpg";

/// Prefix marking a session-local blob reference (user-imported image).
pub const BLOB_SCHEME: &str = "blob:";

pub const INTRO_VIDEO: &str = "/videos/draw.mp4";

pub const REVEAL_CUE_LOCAL: &str = "/audio/reveal.mp3";
pub const REVEAL_CUE_REMOTE: &str =
    "https://cdn.pixabay.com/audio/gacha/reveal.mp3";
pub const CELEBRATE_CUE_LOCAL: &str = "/audio/ssr.mp3";
pub const CELEBRATE_CUE_REMOTE: &str =
    "https://cdn.pixabay.com/audio/gacha/ssr.mp3";

pub const CUE_VOLUME: f32 = 0.5;

/// Delay between the flash starting and the result stage.
pub const FLASH_TO_RESULT: Duration = Duration::from_millis(500);
/// Delay between the flash starting and the flash overlay clearing.
pub const FLASH_CLEAR: Duration = Duration::from_millis(1000);
/// Delay between entering the result stage and the celebration cue.
pub const CELEBRATE_DELAY: Duration = Duration::from_millis(300);

pub const MOCK_IMAGE_BASE: &str = "https://picsum.photos/400/711";

/// Upper bound (inclusive) of the local image bucket a drawn card hints at.
pub const IMAGE_BUCKETS: u32 = 20;

pub const TILT_LIMIT: f64 = 45.0;
pub const REVEAL_POINTER_SPAN: f64 = 40.0;
pub const VIEWER_POINTER_SPAN: f64 = 60.0;

/// Offset applied when cycling imported images across the collection.
pub const COLLECTION_IMPORT_OFFSET: usize = 5;

pub const RESULT_GRID_COLUMNS: usize = 2;
pub const COLLECTION_PLACEHOLDERS: usize = 5;
pub const EXPLORE_REPEAT: usize = 3;

pub fn default_asset_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("gacha-sdk")
    } else {
        PathBuf::from(".gacha-sdk-assets")
    }
}
