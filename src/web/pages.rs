//! Minimal HTML for the three pages. Every interpolated value goes through
//! [`escape`].

use crate::backend::{Registration, User};
use std::fmt::Write as _;

pub(crate) fn login(error: Option<&str>) -> String {
    let mut body = String::from("<h2>Login</h2>\n");
    push_error(&mut body, error);
    body.push_str(
        r#"<form method="post" action="/login">
  <input type="email" name="email" placeholder="Email" required>
  <input type="password" name="password" placeholder="Password" required>
  <button type="submit">Login</button>
</form>
<p><a href="/register">Create an account</a></p>
"#,
    );
    layout("Login", &body)
}

pub(crate) fn register(error: Option<&str>, form: Option<&Registration>) -> String {
    let name = form.map_or("", |form| form.name.as_str());
    let email = form.map_or("", |form| form.email.as_str());

    let mut body = String::from("<h2>Register</h2>\n");
    let _ = write!(
        body,
        r#"<form method="post" action="/register">
  <input type="text" name="name" placeholder="Full Name" value="{}" required>
  <input type="email" name="email" placeholder="Email" value="{}" required>
  <input type="password" name="password" placeholder="Password" required>
  <input type="password" name="password_confirmation" placeholder="Confirm Password" required>
"#,
        escape(name),
        escape(email)
    );
    push_error(&mut body, error);
    body.push_str(
        r#"  <button type="submit">Register</button>
</form>
<p><a href="/login">Already registered? Log in</a></p>
"#,
    );
    layout("Register", &body)
}

pub(crate) fn dashboard(user: &User) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1>Welcome, {}!</h1>
<form method="post" action="/logout">
  <button type="submit">Logout</button>
</form>
<p>Your email is: {}</p>
<p>This is your secure dashboard page.</p>
"#,
        escape(&user.name),
        escape(&user.email)
    );
    layout("Dashboard", &body)
}

pub(crate) fn unavailable() -> String {
    layout(
        "Unavailable",
        "<h2>Service unavailable</h2>\n<p>Please try again in a moment.</p>\n",
    )
}

fn push_error(body: &mut String, error: Option<&str>) {
    if let Some(error) = error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(error));
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

pub(crate) fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
