//! Static HTML for the two form pages.

pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Log in</title>
</head>
<body>
  <h1>Log in</h1>
  <form method="post" action="/login">
    <label>Username <input type="text" name="username" autocomplete="username" required></label>
    <label>Password <input type="password" name="password" autocomplete="current-password" required></label>
    <button type="submit">Log in</button>
  </form>
  <p>No account? <a href="/register">Register</a></p>
</body>
</html>
"#;

pub const REGISTER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Register</title>
</head>
<body>
  <h1>Register</h1>
  <form method="post" action="/register">
    <label>Username <input type="text" name="username" autocomplete="username" required></label>
    <label>Password <input type="password" name="password" autocomplete="new-password" required></label>
    <button type="submit">Register</button>
  </form>
  <p>Already registered? <a href="/login">Log in</a></p>
</body>
</html>
"#;
