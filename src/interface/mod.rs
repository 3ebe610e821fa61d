//! Search-as-you-type interface.
//!
//! [`SearchBox`] is a synchronous state machine driven by explicit
//! timestamps. [`SearchSession`] runs it on tokio against a
//! [`FacilityApi`], which is how the `find` command talks to a server.

pub mod client;
pub mod debounce;
pub mod search_box;
pub mod session;

pub use client::{ClientError, DirectoryClient, FacilityApi};
pub use debounce::Debouncer;
pub use search_box::{SearchBox, SearchRequest, SearchState, directions_url};
pub use session::{SearchSession, SessionEvent};
