use axum::{
    Form,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{debug, info, warn};

use threadboard_db::models::PostRow;
use threadboard_types::forms::{PostForm, ReplyForm};
use threadboard_types::session::SessionUser;

use crate::error::AppError;
use crate::first_missing;
use crate::session;
use crate::state::AppState;
use crate::templates::{CreatePage, EditPage, IndexPage, ReplyPage, ViewPage, render};

// ── Access checks ───────────────────────────────────────────────────────

/// Only the author may edit a post.
pub fn edit_permitted(user: Option<&SessionUser>, post: &PostRow) -> bool {
    user.is_some_and(|u| post.is_authored_by(u.user_id))
}

/// KNOWN GAP: anyone, signed in or not, may delete any post. Tighten here;
/// the delete handler only asks this function.
pub fn delete_permitted(_user: Option<&SessionUser>, _post: &PostRow) -> bool {
    true
}

async fn load_post(state: &AppState, id: i64) -> Result<PostRow, AppError> {
    state
        .run_db(move |db| db.get_post(id))
        .await?
        .ok_or_else(|| {
            debug!(post_id = id, "Post not found");
            AppError::NotFound
        })
}

// ── Extractors ──────────────────────────────────────────────────────────

/// The `{id}` path segment. A segment that is not an `i64` (`abc`, or a
/// number that overflows) names no post and is a 404 like any other
/// unknown id.
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(PostId(id)),
            Err(rejection) => {
                debug!(%rejection, "Unroutable post id");
                Err(AppError::NotFound)
            }
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

/// GET /: top-level posts, newest first.
pub async fn index(State(state): State<AppState>, jar: SignedCookieJar) -> Result<Response, AppError> {
    let posts = state.run_db(|db| db.get_top_level_posts()).await?;
    let (jar, chrome) = session::page_chrome(jar);
    Ok((jar, render(&IndexPage { chrome, posts })?).into_response())
}

/// GET /create/
pub async fn create_page(jar: SignedCookieJar) -> Result<Response, AppError> {
    if session::current_user(&jar).is_none() {
        return Ok(Redirect::to("/signin/").into_response());
    }

    let (jar, chrome) = session::page_chrome(jar);
    let page = CreatePage {
        chrome,
        title: String::new(),
        content: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /create/
pub async fn create(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let Some(user) = session::current_user(&jar) else {
        return Ok(Redirect::to("/signin/").into_response());
    };

    let missing = first_missing(&[
        (form.title.as_str(), "Title is required!"),
        (form.content.as_str(), "Content is required!"),
    ]);
    if let Some(message) = missing {
        let (jar, mut chrome) = session::page_chrome(jar);
        chrome.flash(message);
        let page = CreatePage {
            chrome,
            title: form.title,
            content: form.content,
        };
        return Ok((jar, render(&page)?).into_response());
    }

    let post_id = state
        .run_db(move |db| db.insert_post(Some(&form.title), &form.content, user.user_id, None))
        .await?;

    info!(post_id, user_id = user.user_id, "Post created");
    Ok(Redirect::to("/").into_response())
}

/// GET /{id}/view/: a post and its direct replies.
pub async fn view(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    let replies = state.run_db(move |db| db.get_replies(id)).await?;

    let (jar, chrome) = session::page_chrome(jar);
    let page = ViewPage {
        chrome,
        post,
        replies,
    };
    Ok((jar, render(&page)?).into_response())
}

/// GET /{id}/edit/
pub async fn edit_page(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    if !edit_permitted(session::current_user(&jar).as_ref(), &post) {
        return refuse_edit(jar, &post);
    }

    let (jar, chrome) = session::page_chrome(jar);
    let page = EditPage {
        chrome,
        title: post.title_text().to_string(),
        content: post.content.clone(),
        post,
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /{id}/edit/
pub async fn edit(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    if !edit_permitted(session::current_user(&jar).as_ref(), &post) {
        return refuse_edit(jar, &post);
    }

    let missing = first_missing(&[
        (form.title.as_str(), "Title is required!"),
        (form.content.as_str(), "Content is required!"),
    ]);
    if let Some(message) = missing {
        let (jar, mut chrome) = session::page_chrome(jar);
        chrome.flash(message);
        let page = EditPage {
            chrome,
            post,
            title: form.title,
            content: form.content,
        };
        return Ok((jar, render(&page)?).into_response());
    }

    state
        .run_db(move |db| db.update_post(id, &form.title, &form.content))
        .await?;

    info!(post_id = id, "Post edited");
    Ok(Redirect::to("/").into_response())
}

fn refuse_edit(jar: SignedCookieJar, post: &PostRow) -> Result<Response, AppError> {
    warn!(post_id = post.id, "Edit refused for non-author");
    let jar = session::push_flash(jar, "Can't edit this post!")?;
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /{id}/reply/
pub async fn reply_page(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    if session::current_user(&jar).is_none() {
        return require_account(jar);
    }

    let (jar, chrome) = session::page_chrome(jar);
    let page = ReplyPage {
        chrome,
        post,
        reply_text: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /{id}/reply/
pub async fn reply(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
    Form(form): Form<ReplyForm>,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    let Some(user) = session::current_user(&jar) else {
        return require_account(jar);
    };

    if form.reply_text.is_empty() {
        let (jar, mut chrome) = session::page_chrome(jar);
        chrome.flash("1 character minimum is needed!");
        let page = ReplyPage {
            chrome,
            post,
            reply_text: form.reply_text,
        };
        return Ok((jar, render(&page)?).into_response());
    }

    let parent_id = post.id;
    let reply_id = state
        .run_db(move |db| db.insert_post(None, &form.reply_text, user.user_id, Some(parent_id)))
        .await?;

    info!(reply_id, parent_id, user_id = user.user_id, "Reply posted");
    Ok(Redirect::to(&format!("/{}/view/", parent_id)).into_response())
}

fn require_account(jar: SignedCookieJar) -> Result<Response, AppError> {
    let jar = session::push_flash(jar, "Need an account to reply!")?;
    Ok((jar, Redirect::to("/signin/")).into_response())
}

/// POST /{id}/delete/. Replies to the post are not removed.
pub async fn delete(
    State(state): State<AppState>,
    PostId(id): PostId,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let post = load_post(&state, id).await?;
    let user = session::current_user(&jar);
    if !delete_permitted(user.as_ref(), &post) {
        let jar = session::push_flash(jar, "Can't delete this post!")?;
        return Ok((jar, Redirect::to("/")).into_response());
    }

    state.run_db(move |db| db.delete_post(id)).await?;

    info!(post_id = id, user_id = ?user.map(|u| u.user_id), "Post deleted");
    // replies carry no title and are announced as "None"
    let title = post.title.as_deref().unwrap_or("None");
    let jar = session::push_flash(jar, format!("\"{}\" was successfully deleted!", title))?;
    Ok((jar, Redirect::to("/")).into_response())
}
