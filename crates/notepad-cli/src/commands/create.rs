use std::path::Path;

use notepad_core::api::NotesApi;
use notepad_core::storage::ObjectStorage;
use notepad_core::{DisplayedNote, ImageFile, NoteDraft, NoteListController};

use crate::commands::common::{format_note_lines, note_to_list_item, open_controller};
use crate::error::CliError;

pub async fn run_create(
    name: &str,
    description: &str,
    image: Option<&Path>,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let mut controller = open_controller(global_profile)?;

    let Some(created) = create_with_image(&mut controller, name, description, image).await? else {
        eprintln!("Name and description are required; nothing was created.");
        return Ok(());
    };

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&note_to_list_item(&created))?
        );
    } else {
        for line in format_note_lines(std::slice::from_ref(&created)) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Upload the optional image, then submit the note.
///
/// An incomplete note returns `Ok(None)` before the image is read or uploaded.
pub async fn create_with_image<A: NotesApi, S: ObjectStorage>(
    controller: &mut NoteListController<A, S>,
    name: &str,
    description: &str,
    image: Option<&Path>,
) -> Result<Option<DisplayedNote>, CliError> {
    let draft = NoteDraft {
        name: name.to_string(),
        description: description.to_string(),
        image: None,
    };
    if !draft.is_complete() {
        return Ok(None);
    }

    let file = match image {
        Some(path) => Some(ImageFile::from_path(path).await?),
        None => None,
    };
    controller.upload_image(file).await?;

    controller.set_name(draft.name);
    controller.set_description(draft.description);
    Ok(controller.create_note().await?)
}
