//! Rows of the settings sidebar and the actions they produce.
//!
//! Selector rows (tone, slogans, model, creativity) step through their
//! values with Left/Right; button rows fire a single action on Enter.

use crate::core::app::AppAction;
use crate::core::feedback::Sentiment;
use crate::core::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarItem {
    Tone,
    Slogans,
    Model,
    Creativity,
    ClearHistory,
    ThumbsUp,
    ThumbsDown,
    AddCredits,
}

impl SidebarItem {
    pub const ALL: [SidebarItem; 8] = [
        SidebarItem::Tone,
        SidebarItem::Slogans,
        SidebarItem::Model,
        SidebarItem::Creativity,
        SidebarItem::ClearHistory,
        SidebarItem::ThumbsUp,
        SidebarItem::ThumbsDown,
        SidebarItem::AddCredits,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SidebarItem::Tone => "Tone",
            SidebarItem::Slogans => "Slogans",
            SidebarItem::Model => "Model",
            SidebarItem::Creativity => "Creativity",
            SidebarItem::ClearHistory => "Clear chat history",
            SidebarItem::ThumbsUp => "👍 Good response",
            SidebarItem::ThumbsDown => "👎 Bad response",
            SidebarItem::AddCredits => "Add credits",
        }
    }

    /// Current value shown next to a selector row.
    pub fn value(self, settings: &Settings) -> Option<String> {
        match self {
            SidebarItem::Tone => Some(settings.tone.label().to_string()),
            SidebarItem::Slogans => Some(settings.slogan_count.to_string()),
            SidebarItem::Model => Some(settings.model.label().to_string()),
            SidebarItem::Creativity => Some(settings.creativity.label().to_string()),
            _ => None,
        }
    }

    /// Step a selector forward or backward. Slogan counts saturate at the bounds.
    pub fn adjust(self, settings: &Settings, forward: bool) -> Option<AppAction> {
        match self {
            SidebarItem::Tone => Some(AppAction::SelectTone {
                tone: if forward {
                    settings.tone.next()
                } else {
                    settings.tone.previous()
                },
            }),
            SidebarItem::Slogans => Some(AppAction::SetSloganCount {
                count: if forward {
                    settings.slogan_count.increment()
                } else {
                    settings.slogan_count.decrement()
                },
            }),
            SidebarItem::Model => Some(AppAction::SelectModel {
                model: settings.model.next(),
            }),
            SidebarItem::Creativity => Some(AppAction::SelectCreativity {
                level: if forward {
                    settings.creativity.next()
                } else {
                    settings.creativity.previous()
                },
            }),
            _ => None,
        }
    }

    pub fn activate(self, settings: &Settings) -> Option<AppAction> {
        match self {
            SidebarItem::ClearHistory => Some(AppAction::ClearHistory),
            SidebarItem::ThumbsUp => Some(AppAction::SubmitFeedback {
                sentiment: Sentiment::Positive,
            }),
            SidebarItem::ThumbsDown => Some(AppAction::SubmitFeedback {
                sentiment: Sentiment::Negative,
            }),
            SidebarItem::AddCredits => Some(AppAction::ShowPaymentLink),
            selector => selector.adjust(settings, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{Creativity, ModelChoice, SloganCount, Tone};

    #[test]
    fn tone_selector_wraps_both_ways() {
        let settings = Settings {
            tone: Tone::Sarcastic,
            ..Settings::default()
        };
        match SidebarItem::Tone.adjust(&settings, true) {
            Some(AppAction::SelectTone { tone }) => assert_eq!(tone, Tone::Friendly),
            _ => panic!("expected tone selection"),
        }
        match SidebarItem::Tone.adjust(&Settings::default(), false) {
            Some(AppAction::SelectTone { tone }) => assert_eq!(tone, Tone::Sarcastic),
            _ => panic!("expected tone selection"),
        }
    }

    #[test]
    fn slogan_slider_saturates() {
        let settings = Settings {
            slogan_count: SloganCount::new(5).expect("valid"),
            ..Settings::default()
        };
        match SidebarItem::Slogans.adjust(&settings, true) {
            Some(AppAction::SetSloganCount { count }) => assert_eq!(count.get(), 5),
            _ => panic!("expected count"),
        }
        match SidebarItem::Slogans.adjust(&Settings::default(), false) {
            Some(AppAction::SetSloganCount { count }) => assert_eq!(count.get(), 1),
            _ => panic!("expected count"),
        }
    }

    #[test]
    fn model_and_creativity_step() {
        let settings = Settings::default();
        assert!(matches!(
            SidebarItem::Model.adjust(&settings, false),
            Some(AppAction::SelectModel {
                model: ModelChoice::Llama2_13B
            })
        ));
        assert!(matches!(
            SidebarItem::Creativity.activate(&settings),
            Some(AppAction::SelectCreativity {
                level: Creativity::Balanced
            })
        ));
    }

    #[test]
    fn buttons_fire_on_activate_only() {
        let settings = Settings::default();
        for item in [
            SidebarItem::ClearHistory,
            SidebarItem::ThumbsUp,
            SidebarItem::ThumbsDown,
            SidebarItem::AddCredits,
        ] {
            assert!(item.value(&settings).is_none());
            assert!(item.adjust(&settings, true).is_none());
            assert!(item.activate(&settings).is_some());
        }
        assert!(matches!(
            SidebarItem::ThumbsDown.activate(&settings),
            Some(AppAction::SubmitFeedback {
                sentiment: Sentiment::Negative
            })
        ));
    }
}
