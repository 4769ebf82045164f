//! Auth-domain identifiers, the method set, policy states, and tenant credentials.

pub mod credential;
pub mod id;
pub mod method;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use method::*;
pub use secret::*;
