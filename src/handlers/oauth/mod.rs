mod callback_handler;
mod login_handler;

pub use callback_handler::{callback_handler, complete_authorization};
pub use login_handler::login_handler;
