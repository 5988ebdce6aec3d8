//! Main menu buttons and their callback data.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use url::Url;

/// Callback actions carried by the menu buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    MyInfo,
    UpdateName,
    AddLink,
}

impl MenuAction {
    /// Callback data sent by Telegram when the button is pressed.
    pub fn as_str(self) -> &'static str {
        match self {
            MenuAction::MyInfo => "MY_INFO",
            MenuAction::UpdateName => "UPDATE_NAME",
            MenuAction::AddLink => "ADD_LINK",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "MY_INFO" => Some(MenuAction::MyInfo),
            "UPDATE_NAME" => Some(MenuAction::UpdateName),
            "ADD_LINK" => Some(MenuAction::AddLink),
            _ => None,
        }
    }

    fn button(self) -> InlineKeyboardButton {
        let label = match self {
            MenuAction::MyInfo => "ℹ️ My Info",
            MenuAction::UpdateName => "✏️ Update Name",
            MenuAction::AddLink => "📚 Add Link",
        };
        InlineKeyboardButton::callback(label, self.as_str())
    }
}

/// Builds the `/start` menu. The "Open App" button is only shown when a
/// web app URL is configured.
pub fn main_menu(webapp_url: Option<&Url>) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![
        MenuAction::MyInfo.button(),
        MenuAction::UpdateName.button(),
    ]];

    let mut last = Vec::new();
    if let Some(url) = webapp_url {
        last.push(InlineKeyboardButton::web_app(
            "🚀 Open App",
            WebAppInfo { url: url.clone() },
        ));
    }
    last.push(MenuAction::AddLink.button());
    rows.push(last);

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_action_roundtrip_and_unknown() {
        for action in [MenuAction::MyInfo, MenuAction::UpdateName, MenuAction::AddLink] {
            assert_eq!(MenuAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(MenuAction::parse("DELETE_EVERYTHING"), None);
    }

    #[test]
    fn test_menu_without_webapp() {
        let menu = main_menu(None);
        let buttons: Vec<&InlineKeyboardButton> = menu.inline_keyboard.iter().flatten().collect();
        assert_eq!(buttons.len(), 3);
        assert!(buttons
            .iter()
            .all(|b| matches!(b.kind, InlineKeyboardButtonKind::CallbackData(_))));
    }

    #[test]
    fn test_menu_with_webapp() {
        let url = Url::parse("https://ark.example.com/app").unwrap();
        let menu = main_menu(Some(&url));
        let web_app = menu
            .inline_keyboard
            .iter()
            .flatten()
            .find_map(|b| match &b.kind {
                InlineKeyboardButtonKind::WebApp(info) => Some(info.url.clone()),
                _ => None,
            });
        assert_eq!(web_app, Some(url));
    }
}
