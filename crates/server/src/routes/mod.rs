pub mod attempts;
pub mod daily;
pub mod health;
pub mod sessions;
