use crate::middleware::session::CurrentUser;

/// GET /dashboard -> greeting for the logged-in user.
pub async fn dashboard(CurrentUser(user): CurrentUser) -> String {
    format!("Welcome, {user}!")
}
