use catalog_remote::image_host::{total_bytes, HostedImage, ImageHostClient};
use serde::Serialize;

use crate::cli::ImageHostCommand;
use crate::config::OpsConfig;
use crate::error::CliResult;
use crate::output::{render_table, Output};

#[derive(Debug, Serialize)]
struct FolderListing {
    folder: String,
    count: usize,
    total_bytes: u64,
    images: Vec<HostedImage>,
}

impl FolderListing {
    fn render(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .images
            .iter()
            .map(|image| {
                let size = match (image.width, image.height) {
                    (Some(w), Some(h)) => format!("{w}x{h}"),
                    _ => String::new(),
                };
                vec![
                    image.public_id.clone(),
                    image.format.clone().unwrap_or_default(),
                    size,
                    image.bytes.map(|b| b.to_string()).unwrap_or_default(),
                    image.secure_url.clone(),
                ]
            })
            .collect();
        let mut text = render_table(&["PUBLIC ID", "FORMAT", "SIZE", "BYTES", "URL"], &rows);
        text.push_str(&format!(
            "{} image(s) in {}, {} bytes",
            self.count, self.folder, self.total_bytes
        ));
        text
    }
}

pub async fn run(config: &OpsConfig, out: Output, command: ImageHostCommand) -> CliResult<()> {
    match command {
        ImageHostCommand::List { folder } => list(config, out, folder).await,
    }
}

/// `image-host list`: every image under a folder.
async fn list(config: &OpsConfig, out: Output, folder: String) -> CliResult<()> {
    let client = ImageHostClient::new(config.image_host_config()?, config.http_timeout)?;
    let images = client.list_folder(&folder).await?;
    tracing::info!(folder = %folder, count = images.len(), "Listed image host folder");

    let listing = FolderListing {
        count: images.len(),
        total_bytes: total_bytes(&images),
        folder,
        images,
    };
    out.emit(&listing, FolderListing::render)
}
