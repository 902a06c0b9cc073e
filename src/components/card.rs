//! Post cards and list-area states.

use maud::{html, Markup, Render};

use crate::components::button::Button;
use crate::view::{Action, PostElement};

/// One post element: title heading, body paragraph, edit and delete controls.
///
/// Each control is a one-button form posting to `/controls/<control id>`,
/// with the control id percent-encoded.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub element: &'a PostElement,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(element: &'a PostElement) -> Self {
        Self { element }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let element = self.element;
        let post_id = element.id.as_str();

        html! {
            article class="post" id=(element.element_id()) data-post-id=(post_id) {
                h3 { (element.title) }
                p { (element.body) }
                div class="post-controls" {
                    @for control in element.controls() {
                        @let button = match control.action {
                            Action::OpenEditor(_) => Button::secondary(control.label).class("edit"),
                            Action::Delete(_) => Button::danger(control.label).class("delete"),
                        };
                        form method="post" action=(format!("/controls/{}", urlencoding::encode(&control.id))) class="inline-form" {
                            (button.r#type("submit").id(&control.id).post_id(post_id))
                        }
                    }
                }
            }
        }
    }
}

/// The displayed posts, in order.
#[derive(Debug, Clone)]
pub struct PostList<'a> {
    pub elements: &'a [PostElement],
}

impl<'a> PostList<'a> {
    #[must_use]
    pub const fn new(elements: &'a [PostElement]) -> Self {
        Self { elements }
    }
}

impl Render for PostList<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="post-list" {
                @for element in self.elements {
                    (PostCard::new(element))
                }
            }
        }
    }
}

/// Placeholder while the listing is in flight.
#[derive(Debug, Clone)]
pub struct LoadingState<'a> {
    pub message: &'a str,
}

impl<'a> LoadingState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for LoadingState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="loading" aria-busy="true" { (self.message) }
        }
    }
}

/// Inline error indicator that replaces the list.
#[derive(Debug, Clone)]
pub struct ErrorState<'a> {
    pub message: &'a str,
}

impl<'a> ErrorState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for ErrorState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="error-message" role="alert" { (self.message) }
        }
    }
}

/// An empty state component for when there are no posts.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    /// Create a new empty state.
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Create a default "no posts" empty state.
    #[must_use]
    pub const fn no_posts() -> Self {
        Self {
            message: "No posts yet.",
        }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty" { (self.message) }
        }
    }
}
