use std::fmt;

/// Visible screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Welcome,
    Quiz,
    Browse,
    Results,
}

/// Explicit user actions that move between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    Start,
    Browse,
    ViewQuestion,
    Finish,
    Back,
}

impl Screen {
    /// Screen reached by `action`, or `None` when the action is not available here.
    ///
    /// There are no guards beyond the action itself: starting is possible from anywhere,
    /// finishing only from the quiz, viewing a single question only from the browser.
    pub fn transition(self, action: ScreenAction) -> Option<Screen> {
        match (self, action) {
            (_, ScreenAction::Start) => Some(Screen::Quiz),
            (_, ScreenAction::Back) => Some(Screen::Welcome),
            (Screen::Browse, ScreenAction::ViewQuestion) => Some(Screen::Quiz),
            (_, ScreenAction::ViewQuestion) => None,
            (Screen::Quiz, ScreenAction::Finish) => Some(Screen::Results),
            (_, ScreenAction::Finish) => None,
            (_, ScreenAction::Browse) => Some(Screen::Browse),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Welcome => "welcome",
            Screen::Quiz => "quiz",
            Screen::Browse => "browse",
            Screen::Results => "results",
        };
        f.write_str(name)
    }
}
