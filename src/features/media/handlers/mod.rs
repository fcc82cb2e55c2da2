mod media_handler;

pub use media_handler::serve_media;
