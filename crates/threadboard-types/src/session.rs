use serde::{Deserialize, Serialize};

/// The signed-in user as carried in the session cookie.
///
/// Canonical definition lives here so the web layer and its tests agree on
/// the payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

/// Messages waiting to be shown on the next rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashes(pub Vec<String>);

impl Flashes {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_user_json_shape() {
        let user = SessionUser {
            user_id: 7,
            username: "alice".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"user_id":7,"username":"alice"}"#);
    }

    #[test]
    fn flashes_keep_insertion_order() {
        let mut flashes = Flashes::default();
        assert_eq!(flashes, Flashes(Vec::new()));
        flashes.push("first");
        flashes.push(String::from("second"));
        assert_eq!(flashes.into_inner(), vec!["first", "second"]);
    }
}
