use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{debug, info};

use threadboard_types::forms::{SigninForm, SignupForm};
use threadboard_types::session::SessionUser;

use crate::error::AppError;
use crate::first_missing;
use crate::password;
use crate::session;
use crate::state::AppState;
use crate::templates::{SigninPage, SignupPage, render};

/// GET /signup/
pub async fn signup_page(jar: SignedCookieJar) -> Result<Response, AppError> {
    let (jar, chrome) = session::page_chrome(jar);
    let page = SignupPage {
        chrome,
        username: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /signup/. A duplicate username is not caught here and ends up as
/// an internal error.
pub async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if let Some(message) = first_missing(&[
        (form.username.as_str(), "Username is needed!"),
        (form.password.as_str(), "Password is needed!"),
    ]) {
        let (jar, mut chrome) = session::page_chrome(jar);
        chrome.flash(message);
        let page = SignupPage {
            chrome,
            username: form.username,
        };
        return Ok((jar, render(&page)?).into_response());
    }

    let scheme = state.passwords;
    let username = form.username.clone();
    let submitted = form.password;
    let user_id = state
        .run_db(move |db| {
            let stored = scheme.prepare(&submitted)?;
            db.insert_user(&username, &stored)
        })
        .await?;

    info!(user_id, username = %form.username, "User signed up");
    Ok(Redirect::to("/").into_response())
}

/// GET /signin/
pub async fn signin_page(jar: SignedCookieJar) -> Result<Response, AppError> {
    let (jar, chrome) = session::page_chrome(jar);
    let page = SigninPage {
        chrome,
        username: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /signin/
pub async fn signin(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(mut form): Form<SigninForm>,
) -> Result<Response, AppError> {
    let missing = first_missing(&[
        (form.username.as_str(), "Username is needed!"),
        (form.password.as_str(), "Password is needed!"),
    ]);
    let failure = match missing {
        Some(message) => message,
        None => {
            let username = form.username.clone();
            let submitted = std::mem::take(&mut form.password);
            let user = state
                .run_db(move |db| {
                    let user = db.get_user_by_username(&username)?;
                    Ok(user.filter(|u| password::verify(&u.password, &submitted)))
                })
                .await?;

            if let Some(user) = user {
                let jar = session::sign_in(
                    jar,
                    &SessionUser {
                        user_id: user.id,
                        username: user.username,
                    },
                )?;
                info!(user_id = user.id, "User signed in");
                return Ok((jar, Redirect::to("/")).into_response());
            }

            debug!(username = %form.username, "Rejected sign-in");
            "Invalid username or password"
        }
    };

    let (jar, mut chrome) = session::page_chrome(jar);
    chrome.flash(failure);
    let page = SigninPage {
        chrome,
        username: form.username,
    };
    Ok((jar, render(&page)?).into_response())
}

/// GET /logout
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    if let Some(user) = session::current_user(&jar) {
        info!(user_id = user.user_id, "User signed out");
    }
    (session::sign_out(jar), Redirect::to("/"))
}
