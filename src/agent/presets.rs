//! Built-in example agents offered when nothing has been saved yet.

use super::config::{AgentConfig, DatabaseSearchFilters};
use crate::capabilities::builtin;

const DEFAULT_PROMPT: &str = "You are a helpful assistant helping a user organize and manage \
their personal knowledge and notes. You can search their notes, read files and create, \
edit or append to notes when asked. Prefer answering from the user's notes and say so \
when the notes do not cover a question.";

const ORGANIZER_PROMPT: &str = "You keep the user's vault tidy. List the files first, then \
propose a folder structure and create directories and notes only after the user agrees. \
Never delete a note unless the user names it explicitly.";

const RESEARCH_PROMPT: &str = "You are a research assistant. Search the user's notes for \
material relevant to the question, quote the passages you rely on and name the note each \
quote comes from.";

/// The preset used when no config is persisted.
pub fn default_preset() -> AgentConfig {
    AgentConfig::new(
        "Default",
        builtin::all(),
        DEFAULT_PROMPT,
        Some(DatabaseSearchFilters::default()),
    )
}

/// All built-in presets; the first one is [`default_preset`].
pub fn example_presets() -> Vec<AgentConfig> {
    vec![
        default_preset(),
        AgentConfig::new(
            "Vault Organizer",
            vec![
                builtin::list_files(),
                builtin::read_file(),
                builtin::create_directory(),
                builtin::create_note(),
                builtin::edit_note(),
                builtin::delete_note(),
            ],
            ORGANIZER_PROMPT,
            None,
        ),
        AgentConfig::new(
            "Research Assistant",
            vec![builtin::search(), builtin::read_file()],
            RESEARCH_PROMPT,
            Some(DatabaseSearchFilters {
                limit: 15,
                pass_full_note_into_context: false,
                ..DatabaseSearchFilters::default()
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityRegistry;

    #[test]
    fn test_presets_reference_registered_tools() {
        let registry = CapabilityRegistry::builtin();
        for preset in example_presets() {
            for tool in preset.tool_definitions() {
                assert!(registry.contains(&tool.name), "{} in {}", tool.name, preset.name());
            }
            assert!(preset.tool_specs().is_ok());
        }
    }

    #[test]
    fn test_default_preset_is_first() {
        let presets = example_presets();
        assert_eq!(presets[0], default_preset());
        assert!(presets[0].enables("search"));
        assert!(presets[0].search_enabled());
        assert!(!presets[1].search_enabled());
    }
}
