/// Types shared between the web handlers and their tests.
///
/// `forms` holds the urlencoded bodies each route accepts, `session` the
/// payload carried inside the signed session cookie.
pub mod forms;
pub mod session;
