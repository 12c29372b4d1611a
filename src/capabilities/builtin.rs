//! The built-in capability catalog.

use super::capability::{CapabilityDefinition, CapabilityParameter};

/// Default number of excerpts returned by `search`.
pub const DEFAULT_SEARCH_LIMIT: u64 = 20;

pub fn search() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "search",
        "Semantically search the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string("query", "The query to search for"))
    .with_parameter(
        CapabilityParameter::number("limit", "The number of results to return")
            .with_default(DEFAULT_SEARCH_LIMIT),
    )
    .with_auto_execute(true)
}

pub fn create_note() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "createNote",
        "Create a new note in the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string("filename", "The filename of the note"))
    .with_parameter(CapabilityParameter::string("content", "The content of the note"))
}

pub fn create_directory() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "createDirectory",
        "Create a new directory in the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string(
        "directoryName",
        "The name of the directory to create",
    ))
}

pub fn read_file() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "readFile",
        "Read a file from the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string(
        "filePath",
        "The path of the file to read",
    ))
}

pub fn delete_note() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "deleteNote",
        "Delete a note from the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string(
        "filename",
        "The filename of the note to delete",
    ))
}

pub fn append_to_note() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "appendToNote",
        "Append to a note in the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string(
        "filename",
        "The filename of the note to append to",
    ))
    .with_parameter(CapabilityParameter::string(
        "content",
        "The content to append to the note",
    ))
}

pub fn edit_note() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "editNote",
        "Edit a note in the user's personal knowledge base",
    )
    .with_parameter(CapabilityParameter::string(
        "filename",
        "The filename of the note to edit",
    ))
    .with_parameter(CapabilityParameter::string(
        "content",
        "The content to edit the note to",
    ))
}

pub fn list_files() -> CapabilityDefinition {
    CapabilityDefinition::new(
        "listFiles",
        "List all files in the user's personal knowledge base",
    )
}

/// All built-in definitions in registry order.
pub fn all() -> Vec<CapabilityDefinition> {
    vec![
        search(),
        create_note(),
        create_directory(),
        read_file(),
        delete_note(),
        edit_note(),
        append_to_note(),
        list_files(),
    ]
}
