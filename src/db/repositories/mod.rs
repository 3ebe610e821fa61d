pub mod facility;
pub mod history;
pub mod user;
