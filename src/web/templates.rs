//! Page template for the post board.

use maud::{html, Markup, Render};

use crate::client::PostsApi;
use crate::components::{
    Alert, BaseLayout, Button, Form, FormGroup, HiddenInput, Input, TextArea,
};
use crate::controller::{Controller, Editor, Notice, NoticeLevel, PostForm};
use crate::model::PostId;

/// Render the whole page from the controller's current state.
pub fn render_page<A: PostsApi>(controller: &Controller<A>) -> String {
    let content = html! {
        h1 { "Posts" }
        @if let Some(notice) = controller.notice() {
            (render_notice(notice))
        }
        section id="create" {
            h2 { "New post" }
            (render_primary_form(controller.primary()))
        }
        @match controller.editor() {
            Editor::Visible { id, title, body } => {
                (render_editing_area(id, title, body))
            }
            Editor::Hidden => {}
        }
        section id="posts" {
            (controller.view())
        }
        (Form::post("/reload", Button::outline("Reload").r#type("submit").render())
            .class("inline-form"))
    };

    BaseLayout::new("Posts").render(content).into_string()
}

fn render_notice(notice: &Notice) -> Markup {
    match notice.level {
        NoticeLevel::Success => Alert::success(&notice.message).render(),
        NoticeLevel::Info => Alert::info(&notice.message).render(),
        NoticeLevel::Error => Alert::error(&notice.message).with_title("Error").render(),
    }
}

/// The primary form: hidden id, title and body.
fn render_primary_form(form: &PostForm) -> Markup {
    let id = form.id.as_ref().map_or("", PostId::as_str);
    let fields = html! {
        (HiddenInput::new("id", id).id("postId"))
        (FormGroup::new(
            "Title",
            "title",
            Input::text("title").id("title").value(&form.title).placeholder("Title").render(),
        ))
        (FormGroup::new(
            "Body",
            "body",
            TextArea::new("body").id("body").rows(3).value(&form.body).placeholder("Body").render(),
        ))
        (Button::primary("Save post").r#type("submit"))
    };
    Form::post("/posts", fields)
        .id("postForm")
        .class("post-form")
        .render()
}

/// The editing area, shown while one post is being edited.
fn render_editing_area(id: &PostId, title: &str, body: &str) -> Markup {
    let fields = html! {
        (HiddenInput::new("id", id.as_str()).id("editPostId"))
        (FormGroup::new(
            "Title",
            "editTitle",
            Input::text("title").id("editTitle").value(title).render(),
        ))
        (FormGroup::new(
            "Body",
            "editBody",
            TextArea::new("body").id("editBody").rows(3).value(body).render(),
        ))
        (Button::primary("Update post").r#type("submit"))
    };

    html! {
        section id="editingArea" {
            h2 { "Edit post " (id) }
            (Form::post("/editor", fields).id("editForm").class("post-form"))
            (Form::post("/editor/cancel", Button::outline("Cancel").r#type("submit").render())
                .class("inline-form"))
        }
    }
}
