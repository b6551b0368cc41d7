pub mod authenticated_user;
pub mod maybe_authenticated;
