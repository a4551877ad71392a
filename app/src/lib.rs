//! Magic Zebra: prepares PDFs and images for continuous-roll label printers.
//!
//! Every page is un-rotated, turned to portrait and scaled to the configured
//! content width; the result is written as a PDF sized for the roll.

pub mod config;
pub mod services;

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}
