//! Numbered main menu

use std::io::{self, Write};

use ai_core::CatalogEntry;
use domain::ModelSelection;

/// Heading printed above the menu
pub const TITLE: &str = "------------ Gen AI Hands-on ------------";

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ListModels,
    Invoke {
        selection: ModelSelection,
        streaming: bool,
    },
    Exit,
}

impl MenuAction {
    /// Text shown next to the option number
    pub fn label(&self) -> String {
        match self {
            Self::ListModels => "List all the models".to_string(),
            Self::Invoke {
                selection,
                streaming: false,
            } => format!("Test {} ({})", selection.display_name(), selection.modality()),
            Self::Invoke {
                selection,
                streaming: true,
            } => format!("Test {} with streaming", selection.display_name()),
            Self::Exit => "Exit".to_string(),
        }
    }
}

/// The main menu, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    actions: Vec<MenuAction>,
}

impl Menu {
    /// Listing first, then every selection (followed by its streaming
    /// variant when supported), then exit
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let mut actions = vec![MenuAction::ListModels];
        for entry in entries {
            actions.push(MenuAction::Invoke {
                selection: entry.selection,
                streaming: false,
            });
            if entry.supports_streaming {
                actions.push(MenuAction::Invoke {
                    selection: entry.selection,
                    streaming: true,
                });
            }
        }
        actions.push(MenuAction::Exit);

        Self { actions }
    }

    pub fn actions(&self) -> &[MenuAction] {
        &self.actions
    }

    /// Print the numbered options
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{TITLE}")?;
        for (index, action) in self.actions.iter().enumerate() {
            writeln!(out, "{}. {}", index + 1, action.label())?;
        }
        Ok(())
    }

    /// Action for a 1-based option number; `None` for anything else
    pub fn choose(&self, answer: &str) -> Option<MenuAction> {
        let number: usize = answer.trim().parse().ok()?;
        number
            .checked_sub(1)
            .and_then(|index| self.actions.get(index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use domain::Modality;

    use super::*;

    fn entry(selection: ModelSelection, supports_streaming: bool) -> CatalogEntry {
        CatalogEntry {
            selection,
            modality: selection.modality(),
            supports_streaming,
        }
    }

    fn menu() -> Menu {
        Menu::from_entries(&[
            entry(ModelSelection::TitanText, true),
            entry(ModelSelection::Jurassic2, false),
            entry(ModelSelection::TitanEmbedding, false),
        ])
    }

    #[test]
    fn streaming_variant_follows_its_selection() {
        assert_eq!(
            menu().actions(),
            [
                MenuAction::ListModels,
                MenuAction::Invoke {
                    selection: ModelSelection::TitanText,
                    streaming: false
                },
                MenuAction::Invoke {
                    selection: ModelSelection::TitanText,
                    streaming: true
                },
                MenuAction::Invoke {
                    selection: ModelSelection::Jurassic2,
                    streaming: false
                },
                MenuAction::Invoke {
                    selection: ModelSelection::TitanEmbedding,
                    streaming: false
                },
                MenuAction::Exit,
            ]
        );
    }

    #[test]
    fn choose_accepts_one_based_numbers() {
        let menu = menu();
        assert_eq!(menu.choose("1"), Some(MenuAction::ListModels));
        assert_eq!(menu.choose(" 6 "), Some(MenuAction::Exit));
        assert_eq!(
            menu.choose("3"),
            Some(MenuAction::Invoke {
                selection: ModelSelection::TitanText,
                streaming: true
            })
        );
    }

    #[test]
    fn choose_rejects_everything_else() {
        let menu = menu();
        for answer in ["", "0", "7", "-1", "two", "1.5"] {
            assert_eq!(menu.choose(answer), None, "answer {answer:?}");
        }
    }

    #[test]
    fn render_numbers_every_action() {
        let mut out = Vec::new();
        menu().render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[1], "1. List all the models");
        assert_eq!(lines[2], "2. Test Amazon Titan Text (text)");
        assert_eq!(lines[3], "3. Test Amazon Titan Text with streaming");
        assert_eq!(lines[6], "6. Exit");
    }

    #[test]
    fn label_mentions_modality() {
        let action = MenuAction::Invoke {
            selection: ModelSelection::StableDiffusion,
            streaming: false,
        };
        assert!(action.label().contains(&Modality::Image.to_string()));
    }
}
