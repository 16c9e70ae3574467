//! the interactive layer: session state, localized texts and narrated explanations
/// Arabic (default) and English labels, banners and error texts
/// ```
/// use RustedMathForm::session::i18n::{Locale, Message};
/// assert_eq!(Locale::default().message(&Message::Result("5".into())), "النتيجة = 5");
/// ```
pub mod i18n;
/// explanation steps for every result and the narrator seam
pub mod narration;
/// # Session
/// every form action is a `Request` applied to a `SessionState`:
/// ```
/// use RustedMathForm::session::state::{handle, Request, SessionState};
/// let state = SessionState::default();
/// let (state, response) = handle(state, Request::Solve { equation: "2*x+5=15".to_string() });
/// println!("{}", response.banner.text());
/// assert_eq!(state.history_newest_first(), vec!["2*x+5=15 -> [5]"]);
/// ```
pub mod state;
