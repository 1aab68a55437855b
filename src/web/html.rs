//! HTML rendering for the browser pages

use crate::models::{Book, LibraryBook};

/// Suffix appended to server-side failures shown in the banner
pub const RETRY_SUFFIX: &str = "Please try again";

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>.errorMessages {{ color: red }}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn error_line(message: Option<&str>) -> String {
    format!(
        r#"<div class="errorMessages">{}</div>"#,
        message.map(escape).unwrap_or_default()
    )
}

fn banner(message: Option<&str>) -> String {
    match message {
        Some(msg) => format!(
            r#"<p class="errorMessages">{} {}</p>"#,
            escape(msg),
            RETRY_SUFFIX
        ),
        None => String::new(),
    }
}

/// Values and messages to render the sign-up form with
#[derive(Debug, Default, Clone)]
pub struct SignUpView {
    pub username: String,
    pub email: String,
    pub username_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    /// Failure reported by the sign-up procedure
    pub server_error: Option<String>,
}

pub fn sign_up_page(view: &SignUpView) -> String {
    let body = format!(
        r#"<main>
<form method="post" action="/sign-up">
<h2>Create an account!</h2>
<input type="text" name="username" placeholder="Type your username..." value="{username}">
{username_error}
<input type="email" name="email" placeholder="Type your email..." value="{email}">
{email_error}
<input type="password" name="password" placeholder="Type your password...">
{password_error}
{banner}
<a href="/">Go to login</a>
<button type="submit">Sign Up</button>
</form>
</main>"#,
        username = escape(&view.username),
        username_error = error_line(view.username_error.as_deref()),
        email = escape(&view.email),
        email_error = error_line(view.email_error.as_deref()),
        password_error = error_line(view.password_error.as_deref()),
        banner = banner(view.server_error.as_deref()),
    );
    layout("Register", &body)
}

pub fn login_page(email: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"<main>
<form method="post" action="/login">
<h2>Welcome back!</h2>
<input type="email" name="email" placeholder="Type your email..." value="{email}">
<input type="password" name="password" placeholder="Type your password...">
{banner}
<a href="/sign-up">Go to sign up</a>
<button type="submit">Login</button>
</form>
</main>"#,
        email = escape(email),
        banner = banner(error),
    );
    layout("Login", &body)
}

pub fn unauthorized_page() -> String {
    layout(
        "Not logged in",
        r#"<main>
<h1>You are not logged in!</h1>
<div><a href="/"> LOG IN </a></div>
</main>"#,
    )
}

pub fn library_page(username: &str, entries: &[LibraryBook], error: Option<&str>) -> String {
    let rows: String = if entries.is_empty() {
        "<p>Your library is empty. <a href=\"/books\">Browse books</a></p>".to_string()
    } else {
        entries
            .iter()
            .map(|entry| {
                let url = escape(&entry.book_url);
                format!(
                    r#"<li>
<img src="{image}" alt="{name}" width="64">
<span>{name}</span> <span>{rating}/5</span>
<form method="post" action="/library/rate">
<input type="hidden" name="book_url" value="{url}">
<input type="number" name="rating" min="0" max="5" value="{rating}">
<button type="submit">Rate</button>
</form>
<form method="post" action="/library/remove">
<input type="hidden" name="book_url" value="{url}">
<button type="submit">Remove</button>
</form>
</li>"#,
                    image = escape(&entry.image_url),
                    name = escape(&entry.name),
                    rating = entry.rating,
                    url = url,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<main>
<h1>{username}'s library</h1>
{banner}
<ul>
{rows}
</ul>
<a href="/books">Browse books</a>
<form method="post" action="/logout"><button type="submit">Log out</button></form>
</main>"#,
        username = escape(username),
        banner = banner(error),
        rows = rows,
    );
    layout("My library", &body)
}

pub fn books_page(books: &[Book]) -> String {
    let rows = books
        .iter()
        .map(|book| {
            format!(
                r#"<li>
<img src="{image}" alt="{name}" width="64">
<span>{name}</span>
<form method="post" action="/library/add">
<input type="hidden" name="book_url" value="{url}">
<button type="submit">Add to library</button>
</form>
</li>"#,
                image = escape(&book.image_url),
                name = escape(&book.name),
                url = escape(&book.book_url),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<main>
<h1>Books</h1>
<ul>
{rows}
</ul>
<a href="/library">My library</a>
</main>"#
    );
    layout("Books", &body)
}
