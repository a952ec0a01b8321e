// Per-user navigation state: pure transitions, store dispatch, view rendering.
// Rendering never touches the store; `dispatch::present` loads what it needs first.

pub mod dispatch;
pub mod handlers;
pub mod machine;
pub mod registry;
pub mod view;

pub use registry::SessionRegistry;
