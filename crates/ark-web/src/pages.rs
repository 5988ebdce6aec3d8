//! HTML pages for the mini app.

use ark_models::LibraryItem;

const STYLE: &str = "\
body { font-family: Arial; text-align: center; padding: 50px; background: #f4f4f9; }
h1 { color: #333; }
nav a { margin: 0 8px; color: #007bff; text-decoration: none; }
ul { list-style: none; padding: 0; }
li { margin: 12px 0; }
button { padding: 15px 25px; margin-top: 20px; font-size: 18px; border: none; background: #007bff; color: white; border-radius: 8px; }
button:hover { background: #0056b3; cursor: pointer; }
#floating-message { display: none; position: fixed; bottom: 20px; right: 20px; padding: 12px 16px; background: white; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,.2); }
#floating-message.show { display: block; }";

/// Loads `/message.json` into the floating box once the page is ready.
const WIDGET_SCRIPT: &str = r#"
document.addEventListener("DOMContentLoaded", () => {
  const box = document.getElementById("floating-message");
  const text = document.getElementById("message-text");
  document.getElementById("close-btn").addEventListener("click", () => box.classList.remove("show"));
  fetch("/message.json?cache=" + Date.now())
    .then((res) => res.json())
    .then((data) => { text.textContent = data.message || "No message available."; })
    .catch(() => { text.textContent = "Unable to load message."; })
    .finally(() => box.classList.add("show"));
});"#;

/// A static informational page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
    Word,
    Knee,
    Heart,
    Contact,
}

impl InfoPage {
    pub fn title(self) -> &'static str {
        match self {
            InfoPage::Word => "Word of the Day",
            InfoPage::Knee => "On Bended Knee",
            InfoPage::Heart => "Bleeding Heart",
            InfoPage::Contact => "Contact Us",
        }
    }

    fn body(self) -> &'static str {
        match self {
            InfoPage::Word => "<p>A short passage to carry with you through the day.</p>",
            InfoPage::Knee => "<p>Prayer requests and devotionals from the community.</p>",
            InfoPage::Heart => "<p>Stories of struggle, comfort, and hope.</p>",
            InfoPage::Contact => {
                "<p>Reach the crew through the bot: send <code>/start</code> and pick a menu option.</p>"
            }
        }
    }
}

/// Escapes text for inclusion in HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a><a href=\"/library\">Library</a><a href=\"/word\">Word</a>\
         <a href=\"/knee\">Knee</a><a href=\"/heart\">Heart</a><a href=\"/contact\">Contact</a></nav>\n\
         {body}\n</body>\n</html>\n",
        title = html_escape(title),
    )
}

/// The mini app landing page.
pub fn landing() -> String {
    let body = format!(
        "<h1>👋 Welcome to Ark Mini App</h1>\n\
         <p>Discover Library • Word of the Day • On Bended Knee • Bleeding Heart • Contact Us</p>\n\
         <a href=\"/library\"><button>🚀 Enter App</button></a>\n\
         <div id=\"floating-message\"><span id=\"message-text\"></span> \
         <button id=\"close-btn\">×</button></div>\n\
         <script>{WIDGET_SCRIPT}</script>"
    );
    layout("The Ark", &body)
}

/// The library page listing submitted links, newest first.
pub fn library(items: &[LibraryItem]) -> String {
    let mut body = String::from("<h1>📚 Discover Library</h1>\n");
    if items.is_empty() {
        body.push_str("<p>No links yet. Add one from the bot with /addlink.</p>");
    } else {
        body.push_str("<ul>\n");
        for item in items {
            body.push_str(&format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a> <small>{}</small></li>\n",
                html_escape(&item.url),
                html_escape(&item.title),
                item.created_at.format("%Y-%m-%d"),
            ));
        }
        body.push_str("</ul>");
    }
    layout("Discover Library", &body)
}

/// One of the static informational pages.
pub fn info(page: InfoPage) -> String {
    let body = format!("<h1>{}</h1>\n{}", page.title(), page.body());
    layout(page.title(), &body)
}
