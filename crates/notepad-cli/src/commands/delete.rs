use crate::commands::common::{normalize_note_identifier, open_controller};
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let mut controller = open_controller(global_profile)?;
    controller.fetch_notes().await?;

    controller.delete_note(&note_id).await?;
    println!("{note_id}");
    Ok(())
}
