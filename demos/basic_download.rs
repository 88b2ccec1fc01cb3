//! Basic download demo for media-dl
//!
//! Usage: cargo run --example basic_download -- <url> <destination>
//!
//! Fetches one file with progress output, resizing it as artwork when the
//! destination looks like an image. Set `MEDIA_DL_ARIA2C` to point at an
//! aria2c binary to exercise the accelerated path.

use std::path::PathBuf;

use media_dl::{
    AcceleratorConfig, ArtworkSettings, Config, DownloadRequest, MediaDownloader,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| {
        eprintln!("Usage: basic_download <url> <destination>");
        std::process::exit(2);
    });
    let destination = PathBuf::from(args.next().unwrap_or_else(|| {
        eprintln!("Usage: basic_download <url> <destination>");
        std::process::exit(2);
    }));

    let accelerator_path = std::env::var_os("MEDIA_DL_ARIA2C").map(PathBuf::from);

    println!("═══════════════════════════════════════════════════════════");
    println!("  media-dl Basic Download");
    println!("═══════════════════════════════════════════════════════════");
    println!("  URL:         {}", url);
    println!("  Destination: {}", destination.display());
    match &accelerator_path {
        Some(path) => println!("  Accelerator: {}", path.display()),
        None => println!("  Accelerator: search PATH"),
    }
    println!("═══════════════════════════════════════════════════════════");

    let config = Config {
        accelerator: AcceleratorConfig {
            path: accelerator_path,
            search_path: true,
        },
        ..Default::default()
    };

    let downloader = MediaDownloader::new(config)?;

    let mut request = DownloadRequest::new(&url, &destination);
    request.progress = true;

    // Treat image destinations as artwork and normalize them
    let is_image = destination
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or(false);
    if is_image {
        request.artwork = Some(ArtworkSettings {
            resize: true,
            ..Default::default()
        });
    }

    let outcome = downloader.download(&request).await?;

    println!("\n  Outcome: {outcome}");
    if let Ok(metadata) = std::fs::metadata(&destination) {
        println!("  On disk: {:.2} KB", metadata.len() as f64 / 1_000.0);
    }
    println!("═══════════════════════════════════════════════════════════");

    Ok(())
}
