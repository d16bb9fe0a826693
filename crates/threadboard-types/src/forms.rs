use serde::{Deserialize, Serialize};

// Every field defaults to an empty string so a missing field fails the same
// validation as an empty one instead of rejecting the whole body.

// -- Auth --

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SigninForm {
    pub username: String,
    pub password: String,
}

// -- Posts --

/// Body of both the create and edit forms.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplyForm {
    pub reply_text: String,
}
