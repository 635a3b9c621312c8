//! Server-rendered form pages. Markup is deliberately bare: one form or
//! list per page, no templates.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use common::ChangePasswordRequest;
use model::entities::user::UserRole;
use sea_orm::TransactionTrait;
use serde::Deserialize;
use service::users::{self, NewUser};
use service::{dto, items, sessions, validation, ServiceError};
use tracing::{debug, info, instrument, warn};

use crate::auth::{build_session_cookie, clear_session_cookie, PageAuth};
use crate::error::ApiError;
use crate::extract::{PageForm, PagePath};
use crate::schemas::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub changed: Option<String>,
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><h1>{}</h1>{}</body></html>",
        escape(title),
        escape(title),
        body
    ))
}

fn notice(class: &str, message: Option<&str>) -> String {
    message
        .map(|m| format!("<p class=\"{}\">{}</p>", class, escape(m)))
        .unwrap_or_default()
}

pub(crate) fn error_page(err: ApiError) -> Response {
    let status = err.status();
    (status, page("Error", &notice("error", Some(&err.public_message())))).into_response()
}

fn login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/login\">\
         <input name=\"username\" placeholder=\"Username\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <button type=\"submit\">Log in</button></form>\
         <p><a href=\"/signup\">Create an account</a></p>",
        notice("error", error)
    );
    page("Log in", &body)
}

fn signup_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/signup\">\
         <input name=\"username\" placeholder=\"Username\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <input name=\"confirm_password\" type=\"password\" placeholder=\"Confirm password\">\
         <button type=\"submit\">Sign up</button></form>\
         <p><a href=\"/login\">Already registered?</a></p>",
        notice("error", error)
    );
    page("Sign up", &body)
}

fn settings_page(username: &str, error: Option<&str>, success: Option<&str>) -> Html<String> {
    let body = format!(
        "<p>Signed in as {}</p>{}{}<form method=\"post\" action=\"/settings\">\
         <input name=\"old_password\" type=\"password\" placeholder=\"Current password\">\
         <input name=\"new_password\" type=\"password\" placeholder=\"New password\">\
         <input name=\"confirm_password\" type=\"password\" placeholder=\"Confirm new password\">\
         <button type=\"submit\">Change password</button></form>\
         <p><a href=\"/dashboard\">Back</a></p>",
        escape(username),
        notice("error", error),
        notice("success", success)
    );
    page("Settings", &body)
}

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_form() -> Html<String> {
    login_page(None)
}

#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    PageForm(form): PageForm<LoginForm>,
) -> Response {
    let account = match users::authenticate(&state.db, &form.username, &form.password).await {
        Ok(account) => account,
        Err(ServiceError::InvalidCredentials) => {
            return (StatusCode::UNAUTHORIZED, login_page(Some("Invalid credentials"))).into_response();
        }
        Err(e) => return error_page(e.into()),
    };

    match sessions::create_session(&state.db, account.id, state.session_ttl).await {
        Ok(session) => {
            info!("User {} logged in", account.id);
            let jar = jar.add(build_session_cookie(session.token, state.session_ttl));
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(e) => error_page(e.into()),
    }
}

pub async fn signup_form() -> Html<String> {
    signup_page(None)
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn signup_submit(State(state): State<AppState>, PageForm(form): PageForm<SignupForm>) -> Response {
    if let Err(e) =
        validation::validate_signup(&form.username, &form.password, Some(&form.confirm_password))
    {
        return (StatusCode::BAD_REQUEST, signup_page(Some(&e.to_string()))).into_response();
    }

    let new_user = NewUser {
        username: form.username,
        password: form.password,
        email: None,
        first_name: None,
        last_name: None,
        role: UserRole::Student,
    };
    let result = async {
        let txn = state.db.begin().await?;
        let registered = users::register(&txn, new_user, None).await?;
        txn.commit().await?;
        Ok::<_, ApiError>(registered)
    }
    .await;

    match result {
        Ok((account, _)) => {
            info!("User {} signed up", account.id);
            Redirect::to("/login").into_response()
        }
        Err(e) => (e.status(), signup_page(Some(&e.public_message()))).into_response(),
    }
}

#[instrument(skip(auth), fields(user_id = auth.user_id()))]
pub async fn dashboard(PageAuth(auth): PageAuth) -> Html<String> {
    let mut links = String::from(
        "<ul><li><a href=\"/items\">My items</a></li>\
         <li><a href=\"/settings\">Settings</a></li>",
    );
    if auth.is_admin() {
        links.push_str("<li><a href=\"/admin\">Administration</a></li>");
    }
    links.push_str("<li><a href=\"/logout\">Log out</a></li></ul>");

    let body = format!(
        "<p>Welcome, {}!</p>{}",
        escape(auth.user.display_name().as_str()),
        links
    );
    page("Dashboard", &body)
}

async fn render_items(state: &AppState, user_id: i32, error: Option<&str>) -> Result<Html<String>, ApiError> {
    let items = items::list_items_for_user(&state.db, user_id).await?;
    let mut list = String::from("<ul>");
    for item in &items {
        list.push_str(&format!(
            "<li><strong>{}</strong> {}<form method=\"post\" action=\"/delete-item/{}\">\
             <button type=\"submit\">Delete</button></form></li>",
            escape(&item.title),
            escape(item.description.as_deref().unwrap_or("")),
            item.id
        ));
    }
    list.push_str("</ul>");

    let body = format!(
        "{}<form method=\"post\" action=\"/items\">\
         <input name=\"title\" placeholder=\"Title\">\
         <textarea name=\"description\" placeholder=\"Description\"></textarea>\
         <button type=\"submit\">Add</button></form>{}\
         <p><a href=\"/dashboard\">Back</a></p>",
        notice("error", error),
        list
    );
    Ok(page("My items", &body))
}

#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn items_page(State(state): State<AppState>, PageAuth(auth): PageAuth) -> Response {
    match render_items(&state, auth.user_id(), None).await {
        Ok(html) => html.into_response(),
        Err(e) => error_page(e),
    }
}

#[instrument(skip(state, auth, form), fields(user_id = auth.user_id()))]
pub async fn create_item(
    State(state): State<AppState>,
    PageAuth(auth): PageAuth,
    PageForm(form): PageForm<ItemForm>,
) -> Response {
    let description = Some(form.description.as_str()).filter(|d| !d.trim().is_empty());
    match items::create_item(&state.db, auth.user_id(), &form.title, description).await {
        Ok(_) => Redirect::to("/items").into_response(),
        Err(e) => {
            let err = ApiError::from(e);
            let status = err.status();
            match render_items(&state, auth.user_id(), Some(&err.public_message())).await {
                Ok(html) => (status, html).into_response(),
                Err(e) => error_page(e),
            }
        }
    }
}

#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn delete_item(
    PagePath(item_id): PagePath<i32>,
    State(state): State<AppState>,
    PageAuth(auth): PageAuth,
) -> Response {
    match items::delete_item_owned(&state.db, auth.user_id(), item_id).await {
        Ok(()) => Redirect::to("/items").into_response(),
        Err(e) => error_page(e.into()),
    }
}

pub async fn settings_form(
    PageAuth(auth): PageAuth,
    Query(query): Query<SettingsQuery>,
) -> Html<String> {
    let success = query.changed.map(|_| "Password changed successfully");
    settings_page(&auth.user.username, None, success)
}

#[instrument(skip(state, auth, form), fields(user_id = auth.user_id()))]
pub async fn settings_submit(
    State(state): State<AppState>,
    PageAuth(auth): PageAuth,
    PageForm(form): PageForm<ChangePasswordRequest>,
) -> Response {
    match users::change_password(&state.db, auth.user_id(), &form).await {
        Ok(_) => Redirect::to("/settings?changed=1").into_response(),
        Err(e) => {
            let err = ApiError::from(e);
            debug!("Password change rejected: {}", err);
            (
                err.status(),
                settings_page(&auth.user.username, Some(&err.public_message()), None),
            )
                .into_response()
        }
    }
}

fn forbidden_page() -> Response {
    (
        StatusCode::FORBIDDEN,
        page("Forbidden", &notice("error", Some("Administrator access required"))),
    )
        .into_response()
}

async fn render_admin(state: &AppState, error: Option<&str>) -> Result<Html<String>, ApiError> {
    let accounts = users::list_users(&state.db).await?;
    let mut rows = String::from("<table><tr><th>ID</th><th>Username</th><th>Role</th><th></th></tr>");
    for account in &accounts {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>\
             <form method=\"post\" action=\"/admin/delete-user/{}\">\
             <button type=\"submit\">Delete</button></form></td></tr>",
            account.id,
            escape(&account.username),
            dto::role_to_dto(account.role).as_str(),
            account.id
        ));
    }
    rows.push_str("</table>");

    let body = format!(
        "{}{}<h2>Add user</h2><form method=\"post\" action=\"/admin/add-user\">\
         <input name=\"username\" placeholder=\"Username\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password\">\
         <select name=\"role\"><option>student</option><option>professor</option>\
         <option>admin</option></select>\
         <button type=\"submit\">Add</button></form>\
         <p><a href=\"/dashboard\">Back</a></p>",
        notice("error", error),
        rows
    );
    Ok(page("Administration", &body))
}

#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn admin_page(State(state): State<AppState>, PageAuth(auth): PageAuth) -> Response {
    if !auth.is_admin() {
        warn!("Non-admin {} requested /admin", auth.user_id());
        return forbidden_page();
    }
    match render_admin(&state, None).await {
        Ok(html) => html.into_response(),
        Err(e) => error_page(e),
    }
}

async fn admin_error(state: &AppState, err: ApiError) -> Response {
    let status = err.status();
    match render_admin(state, Some(&err.public_message())).await {
        Ok(html) => (status, html).into_response(),
        Err(e) => error_page(e),
    }
}

#[instrument(skip(state, auth, form), fields(user_id = auth.user_id(), username = %form.username))]
pub async fn admin_add_user(
    State(state): State<AppState>,
    PageAuth(auth): PageAuth,
    PageForm(form): PageForm<AddUserForm>,
) -> Response {
    if !auth.is_admin() {
        return forbidden_page();
    }

    let role = if form.role.trim().is_empty() {
        Ok(common::Role::Student)
    } else {
        form.role.parse::<common::Role>()
    };
    let role = match role {
        Ok(role) => dto::role_from_dto(role),
        Err(_) => {
            let err = ServiceError::Validation("Role must be student, professor or admin".to_string());
            return admin_error(&state, err.into()).await;
        }
    };

    let new_user = NewUser {
        username: form.username,
        password: form.password,
        email: None,
        first_name: None,
        last_name: None,
        role,
    };
    let result = async {
        let txn = state.db.begin().await?;
        let registered = users::register(&txn, new_user, None).await?;
        txn.commit().await?;
        Ok::<_, ApiError>(registered)
    }
    .await;

    match result {
        Ok((account, _)) => {
            info!("Admin {} added user {}", auth.user_id(), account.id);
            Redirect::to("/admin").into_response()
        }
        Err(e) => admin_error(&state, e).await,
    }
}

#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn admin_delete_user(
    PagePath(target_id): PagePath<i32>,
    State(state): State<AppState>,
    PageAuth(auth): PageAuth,
) -> Response {
    if !auth.is_admin() {
        return forbidden_page();
    }
    if target_id == auth.user_id() {
        let err = ServiceError::Validation("You cannot delete your own account".to_string());
        return admin_error(&state, err.into()).await;
    }

    match users::delete_user_cascade(&state.db, target_id).await {
        Ok(()) => {
            info!("Admin {} deleted user {}", auth.user_id(), target_id);
            Redirect::to("/admin").into_response()
        }
        Err(e) => admin_error(&state, e.into()).await,
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(crate::auth::SESSION_COOKIE).map(|c| c.value().to_owned()) {
        if let Err(e) = sessions::delete_session(&state.db, &token).await {
            warn!("Failed to delete session on logout: {}", e);
        }
    }
    (jar.remove(clear_session_cookie()), Redirect::to("/login")).into_response()
}
