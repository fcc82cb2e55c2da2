mod byte_range;
mod stored_media;

pub use byte_range::{ByteRange, RangeRequest};
pub use stored_media::{MediaContent, StoredMedia};
