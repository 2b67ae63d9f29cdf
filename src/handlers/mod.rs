mod greeting_handler;
pub mod oauth;

pub use greeting_handler::{root_handler, stub_login_handler};
