use std::path::Path;

use notepad_core::ImageFile;

use crate::commands::common::open_controller;
use crate::error::CliError;

pub async fn run_upload(path: &Path, global_profile: Option<&str>) -> Result<(), CliError> {
    let mut controller = open_controller(global_profile)?;
    let file = ImageFile::from_path(path).await?;

    if let Some(key) = controller.upload_image(Some(file)).await? {
        println!("{key}");
    }
    Ok(())
}
