/// Authentication and authorization
///
/// - `claims`: validation of the external identity provider's bearer tokens
/// - `middleware`: axum layer resolving tokens to internal users
/// - `guard`: creator/assignee access decisions on items

pub mod claims;
pub mod guard;
pub mod middleware;
