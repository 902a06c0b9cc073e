//! Maud HTML components for the web UI.
//!
//! - `layout`: Base page layout
//! - `button`: Configurable button component
//! - `alert`: Page-level notices
//! - `card`: Post cards, the post list and list-area states
//! - `form`: Form elements and input components

pub mod alert;
pub mod button;
pub mod card;
pub mod form;
pub mod layout;

pub use alert::{Alert, AlertVariant};
pub use button::{Button, ButtonVariant};
pub use card::{EmptyState, ErrorState, LoadingState, PostCard, PostList};
pub use form::{Form, FormGroup, HiddenInput, Input, TextArea};
pub use layout::BaseLayout;
