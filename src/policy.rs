//! Method configuration documents and the static per-method rule table.
//!
//! `document` models the wire representation the remote service returns and accepts,
//! `target` the fixed all-users scoping element, `tap` the resolved Temporary Access Pass
//! tuning, and `rule` the table that decides, per method, whether a transition is allowed,
//! whether it needs a read first, and which fields it mutates.

pub mod document;
pub mod rule;
pub mod tap;
pub mod target;

pub use document::*;
pub use rule::*;
pub use tap::*;
pub use target::*;
