//! In-memory view of the posts currently displayed.
//!
//! [`ViewState`] owns the rendered list: one [`PostElement`] per known post
//! id, in display order, plus the control registry that maps each rendered
//! edit/delete control to the typed [`Action`] it triggers. The registry is
//! rebuilt after every full render and every insert, and entries are dropped
//! when their element is removed.

use std::collections::{HashMap, HashSet};

use maud::{Markup, Render};
use tracing::debug;

use crate::components::{EmptyState, ErrorState, LoadingState, PostList};
use crate::model::{Post, PostId};

/// What a rendered control does when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the editing area with the post's displayed title and body.
    OpenEditor(PostId),
    /// Delete the post remotely, then remove its element.
    Delete(PostId),
}

impl Action {
    #[must_use]
    pub fn post_id(&self) -> &PostId {
        match self {
            Self::OpenEditor(id) | Self::Delete(id) => id,
        }
    }
}

/// A control rendered inside a post element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Identifier the surface sends back when the control is clicked.
    pub id: String,
    pub label: &'static str,
    pub action: Action,
}

impl Control {
    #[must_use]
    pub fn edit(post_id: &PostId) -> Self {
        Self {
            id: format!("edit-{post_id}"),
            label: "Edit",
            action: Action::OpenEditor(post_id.clone()),
        }
    }

    #[must_use]
    pub fn delete(post_id: &PostId) -> Self {
        Self {
            id: format!("delete-{post_id}"),
            label: "Delete",
            action: Action::Delete(post_id.clone()),
        }
    }
}

/// One displayed post: heading, paragraph and its two controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostElement {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

impl PostElement {
    #[must_use]
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }

    /// DOM id of the element, `post-<id>`.
    #[must_use]
    pub fn element_id(&self) -> String {
        format!("post-{}", self.id)
    }

    #[must_use]
    pub fn controls(&self) -> [Control; 2] {
        [Control::edit(&self.id), Control::delete(&self.id)]
    }
}

/// State of the list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// The initial listing is in flight.
    Loading,
    /// The listing failed; the message replaces the list.
    Failed(String),
    /// Elements are displayed (possibly none).
    Ready,
}

#[derive(Debug)]
pub struct ViewState {
    status: ListStatus,
    elements: Vec<PostElement>,
    controls: HashMap<String, Action>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// An empty, ready list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: ListStatus::Ready,
            elements: Vec::new(),
            controls: HashMap::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    #[must_use]
    pub fn elements(&self) -> &[PostElement] {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, id: &PostId) -> Option<&PostElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PostId) -> bool {
        self.element(id).is_some()
    }

    /// Replace the list area with the loading indicator.
    pub fn show_loading(&mut self) {
        self.elements.clear();
        self.controls.clear();
        self.status = ListStatus::Loading;
    }

    /// Replace the list area with an error indicator.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.elements.clear();
        self.controls.clear();
        self.status = ListStatus::Failed(message.into());
    }

    /// Replace the whole list with one element per post.
    ///
    /// A repeated id keeps its first element.
    pub fn render_all(&mut self, posts: &[Post]) {
        let mut seen = HashSet::new();
        self.elements = posts
            .iter()
            .filter(|p| seen.insert(p.id.clone()))
            .map(PostElement::from_post)
            .collect();
        self.status = ListStatus::Ready;
        self.wire_controls();
    }

    /// Insert an element for `post` at the top of the list.
    ///
    /// An element already shown under the same id is replaced.
    pub fn prepend_one(&mut self, post: &Post) {
        if self.remove_element(&post.id) {
            debug!(post_id = %post.id, "Replacing element with duplicate id");
        }
        self.elements.insert(0, PostElement::from_post(post));
        self.status = ListStatus::Ready;
        self.wire_controls();
    }

    /// Overwrite the displayed title and body of one element.
    ///
    /// Returns `false` without changes if `id` is not shown.
    pub fn update_one(&mut self, id: &PostId, title: &str, body: &str) -> bool {
        match self.elements.iter_mut().find(|e| &e.id == id) {
            Some(element) => {
                element.title = title.to_string();
                element.body = body.to_string();
                true
            }
            None => {
                debug!(post_id = %id, "update_one: no element");
                false
            }
        }
    }

    /// Detach one element and unbind its controls.
    ///
    /// Returns `false` if `id` is not shown.
    pub fn remove_one(&mut self, id: &PostId) -> bool {
        let removed = self.remove_element(id);
        if !removed {
            debug!(post_id = %id, "remove_one: no element");
        }
        removed
    }

    /// Look up the action bound to a rendered control.
    #[must_use]
    pub fn resolve(&self, control_id: &str) -> Option<&Action> {
        self.controls.get(control_id)
    }

    #[must_use]
    pub fn bound_controls(&self) -> usize {
        self.controls.len()
    }

    fn remove_element(&mut self, id: &PostId) -> bool {
        let Some(pos) = self.elements.iter().position(|e| &e.id == id) else {
            return false;
        };
        let element = self.elements.remove(pos);
        for control in element.controls() {
            self.controls.remove(&control.id);
        }
        true
    }

    fn wire_controls(&mut self) {
        self.controls = self
            .elements
            .iter()
            .flat_map(PostElement::controls)
            .map(|c| (c.id, c.action))
            .collect();
        debug!(controls = self.controls.len(), "Wired post controls");
    }
}

impl Render for ViewState {
    fn render(&self) -> Markup {
        match &self.status {
            ListStatus::Loading => LoadingState::new("Loading posts...").render(),
            ListStatus::Failed(message) => ErrorState::new(message).render(),
            ListStatus::Ready if self.elements.is_empty() => EmptyState::no_posts().render(),
            ListStatus::Ready => PostList::new(&self.elements).render(),
        }
    }
}
