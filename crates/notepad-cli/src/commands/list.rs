use crate::commands::common::{format_note_lines, note_to_list_item, open_controller, NoteListItem};
use crate::error::CliError;

pub async fn run_list(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let mut controller = open_controller(global_profile)?;
    controller.fetch_notes().await?;

    if as_json {
        let json_items = controller
            .notes()
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if controller.notes().is_empty() {
        println!("No notes yet.");
    } else {
        for line in format_note_lines(controller.notes()) {
            println!("{line}");
        }
    }

    Ok(())
}
