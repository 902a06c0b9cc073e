//! Base page layout.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Styles are small enough to inline; the page needs no static assets.
const PAGE_STYLE: &str = r"
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }
.post { border: 1px solid #ddd; border-radius: 6px; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
.post h3 { margin: 0 0 0.5rem; }
.post-controls { display: flex; gap: 0.5rem; }
.inline-form { display: inline; }
.form-group { display: flex; flex-direction: column; margin-bottom: 0.5rem; }
.btn { padding: 0.3rem 0.8rem; border-radius: 4px; border: 1px solid #888; cursor: pointer; }
.btn-danger { background: #c0392b; color: #fff; border-color: #c0392b; }
.btn-primary { background: #2c6fbb; color: #fff; border-color: #2c6fbb; }
article.error, .error-message { color: #a61b1b; }
#editingArea { background: #f6f6f6; padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let page = BaseLayout::new("Posts").render(html! { h1 { "Posts" } });
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the complete HTML page with the given content.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - Post Board" }
                    style { (PreEscaped(PAGE_STYLE)) }
                }
                body {
                    main class="container" {
                        (content)
                    }
                }
            }
        }
    }
}
