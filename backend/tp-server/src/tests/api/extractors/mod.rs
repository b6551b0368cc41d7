mod authenticated_user;
mod maybe_authenticated;
