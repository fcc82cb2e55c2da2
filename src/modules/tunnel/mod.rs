//! Public URL discovery for local development behind an ngrok tunnel.

mod ngrok;

pub use ngrok::detect_public_url;
