use askama::Template;
use axum::response::Html;

use threadboard_db::models::PostRow;
use threadboard_types::session::SessionUser;

use crate::error::AppError;

/// Navigation state every page renders: who is signed in, plus the flash
/// messages to show once.
pub struct Chrome {
    user: Option<SessionUser>,
    pub flashes: Vec<String>,
}

impl Chrome {
    pub fn new(user: Option<SessionUser>, flashes: Vec<String>) -> Self {
        Self { user, flashes }
    }

    /// Show `message` on the page being rendered right now.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Empty when anonymous.
    pub fn username(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or_default()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub chrome: Chrome,
    pub posts: Vec<PostRow>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub chrome: Chrome,
    pub username: String,
}

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SigninPage {
    pub chrome: Chrome,
    pub username: String,
}

#[derive(Template)]
#[template(path = "create.html")]
pub struct CreatePage {
    pub chrome: Chrome,
    pub title: String,
    pub content: String,
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewPage {
    pub chrome: Chrome,
    pub post: PostRow,
    pub replies: Vec<PostRow>,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub chrome: Chrome,
    pub post: PostRow,
    pub title: String,
    pub content: String,
}

#[derive(Template)]
#[template(path = "reply.html")]
pub struct ReplyPage {
    pub chrome: Chrome,
    pub post: PostRow,
    pub reply_text: String,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
