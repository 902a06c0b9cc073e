//! Interaction controller.
//!
//! Turns user actions into one remote call each and patches the owned
//! [`ViewState`] once that call succeeds. Failed mutations leave the view as
//! it was, keep the submitted form values so the user can retry, and raise an
//! error notice.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::client::{ClientError, PostsApi};
use crate::model::{Post, PostDraft, PostId};
use crate::view::{Action, ViewState};

/// Shown in the list area when the initial listing fails.
pub const LIST_ERROR_MESSAGE: &str = "Error loading posts.";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Remote(#[from] ClientError),
    #[error("no post is open in the editor")]
    NoPostSelected,
    #[error("editor is open on post {open}, not {submitted}")]
    StaleEditor { open: PostId, submitted: PostId },
    #[error("post {0} is not displayed")]
    UnknownPost(PostId),
    #[error("no control bound to '{0}'")]
    UnknownControl(String),
}

/// Values of the primary form: an optional id plus title and body.
///
/// With no id the form creates a post; with an id it updates that post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub id: Option<PostId>,
    pub title: String,
    pub body: String,
}

impl PostForm {
    #[must_use]
    pub fn create(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn update(id: PostId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn draft(&self) -> PostDraft {
        PostDraft::new(self.title.clone(), self.body.clone())
    }
}

/// The editing area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Editor {
    #[default]
    Hidden,
    Visible {
        id: PostId,
        title: String,
        body: String,
    },
}

impl Editor {
    #[must_use]
    pub fn post_id(&self) -> Option<&PostId> {
        match self {
            Self::Hidden => None,
            Self::Visible { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A one-line message shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Which form an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditSource {
    Primary,
    Editor,
}

pub struct Controller<A> {
    api: A,
    view: ViewState,
    editor: Editor,
    primary: PostForm,
    notice: Option<Notice>,
}

impl<A: PostsApi> Controller<A> {
    /// A controller with an empty list and the editing area hidden.
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: ViewState::new(),
            editor: Editor::Hidden,
            primary: PostForm::default(),
            notice: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Values currently held by the primary form.
    pub fn primary(&self) -> &PostForm {
        &self.primary
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Drop the current notice once it has been shown.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Fetch the first page and render it.
    ///
    /// A failure replaces the list with [`LIST_ERROR_MESSAGE`]; it is not
    /// returned to the caller.
    pub async fn load(&mut self) {
        self.begin_load();
        let result = self.api.list_posts().await;
        self.finish_load(result);
    }

    /// Show the loading indicator in place of the list.
    pub fn begin_load(&mut self) {
        self.view.show_loading();
    }

    /// Render the outcome of a listing started with [`Self::begin_load`].
    ///
    /// The editing area closes if its post is not in the new list.
    pub fn finish_load(&mut self, result: Result<Vec<Post>, ClientError>) {
        match result {
            Ok(posts) => {
                info!(count = posts.len(), "Loaded posts");
                self.view.render_all(&posts);
            }
            Err(e) => {
                error!("Error fetching posts: {e}");
                self.view.show_error(LIST_ERROR_MESSAGE);
            }
        }

        if self
            .editor
            .post_id()
            .is_some_and(|id| !self.view.contains(id))
        {
            debug!("Closing editor for a post that was not relisted");
            self.editor = Editor::Hidden;
        }
    }

    /// Submit the primary form.
    ///
    /// Without an id this creates a post; with one it takes the same update
    /// path as the editing area.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Remote`] if the remote call fails.
    pub async fn submit_primary(&mut self, form: PostForm) -> Result<(), ControllerError> {
        match form.id.clone() {
            None => self.create(form).await.map(drop),
            Some(id) => {
                let draft = form.draft();
                self.primary = form;
                self.save_edit(id, draft, EditSource::Primary).await
            }
        }
    }

    /// Create a post from title and body and show it at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Remote`] if the remote call fails.
    pub async fn submit_create(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Post, ControllerError> {
        self.create(PostForm::create(title, body)).await
    }

    /// Open the editing area with the post's displayed title and body.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::UnknownPost`] if no element is shown for `id`.
    pub fn open_editor(&mut self, id: &PostId) -> Result<(), ControllerError> {
        let Some(element) = self.view.element(id) else {
            warn!(post_id = %id, "Edit requested for a post that is not displayed");
            self.notice = Some(Notice::info(format!("Post {id} is no longer displayed.")));
            return Err(ControllerError::UnknownPost(id.clone()));
        };

        debug!(post_id = %id, "Opening editor");
        self.editor = Editor::Visible {
            id: element.id.clone(),
            title: element.title.clone(),
            body: element.body.clone(),
        };
        Ok(())
    }

    /// Submit the editing area rendered for post `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::NoPostSelected`] if the editing area is
    /// hidden, [`ControllerError::StaleEditor`] if it is open on another post,
    /// or [`ControllerError::Remote`] if the remote call fails.
    pub async fn submit_edit(
        &mut self,
        id: &PostId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<(), ControllerError> {
        let Some(open) = self.editor.post_id() else {
            return Err(ControllerError::NoPostSelected);
        };
        if open != id {
            warn!(open = %open, submitted = %id, "Edit submitted for a post that is not open");
            self.notice = Some(Notice::info(format!(
                "The editor is now open on post {open}; post {id} was not saved."
            )));
            return Err(ControllerError::StaleEditor {
                open: open.clone(),
                submitted: id.clone(),
            });
        }
        let id = id.clone();
        let draft = PostDraft::new(title, body);
        self.editor = Editor::Visible {
            id: id.clone(),
            title: draft.title.clone(),
            body: draft.body.clone(),
        };
        self.save_edit(id, draft, EditSource::Editor).await
    }

    /// Close the editing area without saving.
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.editor.post_id() {
            debug!(post_id = %id, "Editor closed without saving");
        }
        self.editor = Editor::Hidden;
    }

    /// Delete a post remotely, then remove its element.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Remote`] if the remote call fails.
    pub async fn delete(&mut self, id: &PostId) -> Result<(), ControllerError> {
        if let Err(e) = self.api.delete_post(id).await {
            error!(post_id = %id, "Failed to delete post: {e}");
            self.notice = Some(Notice::error(format!("Could not delete post {id}: {e}")));
            return Err(e.into());
        }

        self.view.remove_one(id);
        if self.editor.post_id() == Some(id) {
            self.editor = Editor::Hidden;
        }
        info!(post_id = %id, "Deleted post");
        self.notice = Some(Notice::success("Post deleted."));
        Ok(())
    }

    /// Run the action bound to a rendered control.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::UnknownControl`] if nothing is bound to
    /// `control_id`, otherwise whatever the action returns.
    pub async fn click(&mut self, control_id: &str) -> Result<(), ControllerError> {
        let action = self
            .view
            .resolve(control_id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownControl(control_id.to_string()))?;
        self.dispatch(action).await
    }

    /// Run one action.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), ControllerError> {
        match action {
            Action::OpenEditor(id) => self.open_editor(&id),
            Action::Delete(id) => self.delete(&id).await,
        }
    }

    async fn create(&mut self, form: PostForm) -> Result<Post, ControllerError> {
        let draft = form.draft();
        match self.api.create_post(&draft).await {
            Ok(post) => {
                self.view.prepend_one(&post);
                self.primary = PostForm::default();
                info!(post_id = %post.id, "Created post");
                self.notice = Some(Notice::success("Post created."));
                Ok(post)
            }
            Err(e) => {
                error!("Failed to create post: {e}");
                self.primary = form;
                self.notice = Some(Notice::error(format!("Could not create post: {e}")));
                Err(e.into())
            }
        }
    }

    /// The one update pathway shared by both forms.
    async fn save_edit(
        &mut self,
        id: PostId,
        draft: PostDraft,
        source: EditSource,
    ) -> Result<(), ControllerError> {
        if let Err(e) = self.api.update_post(&id, &draft).await {
            error!(post_id = %id, ?source, "Failed to update post: {e}");
            self.notice = Some(Notice::error(format!("Could not update post {id}: {e}")));
            return Err(e.into());
        }

        self.view.update_one(&id, &draft.title, &draft.body);
        if source == EditSource::Primary {
            self.primary = PostForm::default();
        }
        if source == EditSource::Editor || self.editor.post_id() == Some(&id) {
            self.editor = Editor::Hidden;
        }
        info!(post_id = %id, ?source, "Updated post");
        self.notice = Some(Notice::success("Post updated."));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::view::ListStatus;

    /// In-memory remote that records each call.
    struct FakeApi {
        listing: Option<Vec<Post>>,
        fail_mutations: AtomicBool,
        next_id: AtomicU64,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_posts(posts: Vec<Post>) -> Self {
            Self {
                listing: Some(posts),
                fail_mutations: AtomicBool::new(false),
                next_id: AtomicU64::new(101),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                listing: None,
                ..Self::with_posts(Vec::new())
            }
        }

        fn fail_mutations(&self, fail: bool) {
            self.fail_mutations.store(fail, Ordering::SeqCst);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PostsApi for FakeApi {
        async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
            self.calls.lock().unwrap().push("GET".to_string());
            self.listing.clone().ok_or(ClientError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "offline".to_string(),
            })
        }

        async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError> {
            self.record(format!("POST {}", draft.title))?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            Ok(Post::new(PostId::from(id), &draft.title, &draft.body))
        }

        async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<(), ClientError> {
            self.record(format!("PUT {id} {}", draft.title))
        }

        async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
            self.record(format!("DELETE {id}"))
        }
    }

    fn id(s: &str) -> PostId {
        PostId::new(s)
    }

    fn ids<A: PostsApi>(controller: &Controller<A>) -> Vec<String> {
        controller
            .view()
            .elements()
            .iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    async fn loaded(posts: Vec<Post>) -> Controller<FakeApi> {
        let mut controller = Controller::new(FakeApi::with_posts(posts));
        controller.load().await;
        controller
    }

    #[tokio::test]
    async fn test_initial_state() {
        let controller = Controller::new(FakeApi::with_posts(Vec::new()));
        assert_eq!(controller.editor(), &Editor::Hidden);
        assert!(controller.view().elements().is_empty());
        assert!(controller.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_renders_listing() {
        let controller = loaded(vec![Post::new("1", "A", "B"), Post::new("2", "C", "D")]).await;
        assert_eq!(ids(&controller), ["1", "2"]);
        assert_eq!(controller.view().status(), &ListStatus::Ready);
        assert_eq!(controller.api().calls(), ["GET"]);
    }

    #[tokio::test]
    async fn test_load_failure_shows_error_indicator() {
        let mut controller = Controller::new(FakeApi::unreachable());
        controller.load().await;
        assert_eq!(
            controller.view().status(),
            &ListStatus::Failed(LIST_ERROR_MESSAGE.to_string())
        );
        assert!(controller.view().elements().is_empty());
    }

    #[tokio::test]
    async fn test_loading_state_until_listing_arrives() {
        let mut controller = Controller::new(FakeApi::with_posts(Vec::new()));
        controller.begin_load();
        assert_eq!(controller.view().status(), &ListStatus::Loading);

        controller.finish_load(Ok(vec![Post::new("1", "A", "B")]));
        assert_eq!(controller.view().status(), &ListStatus::Ready);
        assert_eq!(ids(&controller), ["1"]);
    }

    #[tokio::test]
    async fn test_reload_closes_editor_for_unlisted_post() {
        let mut controller = loaded(vec![Post::new("1", "A", "B"), Post::new("2", "C", "D")]).await;
        controller.open_editor(&id("2")).unwrap();

        controller.begin_load();
        controller.finish_load(Ok(vec![Post::new("2", "C", "D")]));
        assert_eq!(controller.editor().post_id(), Some(&id("2")));

        controller.begin_load();
        controller.finish_load(Ok(vec![Post::new("1", "A", "B")]));
        assert_eq!(controller.editor(), &Editor::Hidden);
    }

    #[tokio::test]
    async fn test_clear_notice() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.delete(&id("1")).await.unwrap();
        assert!(controller.notice().is_some());
        controller.clear_notice();
        assert!(controller.notice().is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        assert_eq!(ids(&controller), ["1"]);
        assert_eq!(controller.view().elements()[0].title, "A");

        let created = controller.submit_create("C", "D").await.unwrap();
        assert_eq!(created.id, id("101"));
        assert_eq!(ids(&controller), ["101", "1"]);

        controller.click("delete-1").await.unwrap();
        assert_eq!(ids(&controller), ["101"]);
        assert_eq!(controller.api().calls(), ["GET", "POST C", "DELETE 1"]);
    }

    #[tokio::test]
    async fn test_open_editor_copies_displayed_values() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.submit_primary(PostForm::update(id("1"), "A2", "B2")).await.unwrap();

        controller.click("edit-1").await.unwrap();

        assert_eq!(
            controller.editor(),
            &Editor::Visible {
                id: id("1"),
                title: "A2".to_string(),
                body: "B2".to_string(),
            }
        );
        // Opening the editor is local; only the earlier update hit the remote.
        assert_eq!(controller.api().calls(), ["GET", "PUT 1 A2"]);
    }

    #[tokio::test]
    async fn test_submit_edit_updates_and_hides() {
        let mut controller = loaded(vec![Post::new("1", "A", "B"), Post::new("2", "C", "D")]).await;
        controller.open_editor(&id("2")).unwrap();

        controller.submit_edit(&id("2"), "new title", "new body").await.unwrap();

        assert_eq!(controller.editor(), &Editor::Hidden);
        let element = controller.view().element(&id("2")).unwrap();
        assert_eq!(element.title, "new title");
        assert_eq!(element.body, "new body");
        assert_eq!(controller.view().element(&id("1")).unwrap().title, "A");
        assert_eq!(controller.api().calls(), ["GET", "PUT 2 new title"]);
    }

    #[tokio::test]
    async fn test_submit_edit_requires_open_editor() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        let err = controller.submit_edit(&id("1"), "t", "b").await.unwrap_err();
        assert!(matches!(err, ControllerError::NoPostSelected));
        assert_eq!(controller.api().calls(), ["GET"]);
    }

    #[tokio::test]
    async fn test_submit_edit_rejects_form_for_another_post() {
        let mut controller = loaded(vec![Post::new("1", "A", "B"), Post::new("2", "C", "D")]).await;
        controller.open_editor(&id("1")).unwrap();
        controller.open_editor(&id("2")).unwrap();

        let err = controller.submit_edit(&id("1"), "X", "Y").await.unwrap_err();

        assert!(matches!(
            err,
            ControllerError::StaleEditor { ref open, ref submitted }
                if open == &id("2") && submitted == &id("1")
        ));
        assert_eq!(controller.view().element(&id("1")).unwrap().title, "A");
        assert_eq!(controller.view().element(&id("2")).unwrap().title, "C");
        assert_eq!(controller.editor().post_id(), Some(&id("2")));
        assert_eq!(controller.api().calls(), ["GET"]);
    }

    #[tokio::test]
    async fn test_primary_form_with_id_shares_update_path() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.open_editor(&id("1")).unwrap();

        controller
            .submit_primary(PostForm::update(id("1"), "X", "Y"))
            .await
            .unwrap();

        assert_eq!(controller.view().element(&id("1")).unwrap().title, "X");
        assert_eq!(controller.primary(), &PostForm::default());
        assert_eq!(controller.editor(), &Editor::Hidden);
        assert_eq!(ids(&controller), ["1"]);
    }

    #[tokio::test]
    async fn test_create_clears_primary_form() {
        let mut controller = loaded(Vec::new()).await;
        controller.submit_primary(PostForm::create("C", "D")).await.unwrap();
        assert_eq!(controller.primary(), &PostForm::default());
        assert_eq!(ids(&controller), ["101"]);
        assert_eq!(
            controller.notice().map(|n| n.level),
            Some(NoticeLevel::Success)
        );
    }

    #[tokio::test]
    async fn test_failed_create_keeps_view_and_form() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.api().fail_mutations(true);

        let err = controller
            .submit_primary(PostForm::create("C", "D"))
            .await
            .unwrap_err();

        assert!(matches!(err, ControllerError::Remote(_)));
        assert_eq!(ids(&controller), ["1"]);
        assert_eq!(controller.primary(), &PostForm::create("C", "D"));
        assert_eq!(controller.notice().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_editor_open_with_input() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.open_editor(&id("1")).unwrap();
        controller.api().fail_mutations(true);

        assert!(controller.submit_edit(&id("1"), "t", "b").await.is_err());

        assert_eq!(controller.view().element(&id("1")).unwrap().title, "A");
        assert_eq!(
            controller.editor(),
            &Editor::Visible {
                id: id("1"),
                title: "t".to_string(),
                body: "b".to_string(),
            }
        );

        controller.api().fail_mutations(false);
        controller.submit_edit(&id("1"), "t", "b").await.unwrap();
        assert_eq!(controller.view().element(&id("1")).unwrap().title, "t");
        assert_eq!(controller.notice().map(|n| n.level), Some(NoticeLevel::Success));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_element() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        controller.api().fail_mutations(true);
        assert!(controller.click("delete-1").await.is_err());
        assert_eq!(ids(&controller), ["1"]);
    }

    #[tokio::test]
    async fn test_delete_closes_editor_for_that_post() {
        let mut controller = loaded(vec![Post::new("1", "A", "B"), Post::new("2", "C", "D")]).await;
        controller.open_editor(&id("1")).unwrap();
        controller.delete(&id("1")).await.unwrap();
        assert_eq!(controller.editor(), &Editor::Hidden);

        controller.open_editor(&id("2")).unwrap();
        controller.cancel_edit();
        assert_eq!(controller.editor(), &Editor::Hidden);
    }

    #[tokio::test]
    async fn test_unknown_control_and_post() {
        let mut controller = loaded(vec![Post::new("1", "A", "B")]).await;
        assert!(matches!(
            controller.click("delete-9").await,
            Err(ControllerError::UnknownControl(_))
        ));
        assert!(matches!(
            controller.open_editor(&id("9")),
            Err(ControllerError::UnknownPost(_))
        ));
        assert_eq!(controller.editor(), &Editor::Hidden);
        assert_eq!(controller.api().calls(), ["GET"]);
    }
}
