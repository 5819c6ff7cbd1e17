//! HTTP middleware: session layer and authentication extractors.

pub mod session;

pub use session::{
    OptionalUser, RequireAdmin, RequireUser, clear_current_user, create_session_layer,
    set_current_user,
};
