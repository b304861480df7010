/// Router Module Index
///
/// Splits the routing surface into a small unauthenticated module and the
/// administrative CRUD surface. Authentication/token verification sits in
/// front of this service; the admin routes assume an already-identified
/// caller and consult the policy store for fine-grained checks.

/// Health and other anonymous endpoints.
pub mod public;

/// The /sys CRUD surface: users, roles, menus, articles, config.
pub mod admin;
