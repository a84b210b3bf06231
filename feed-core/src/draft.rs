//! Draft editing rules.
//!
//! The draft is the post currently being composed. It starts as
//! [`Post::empty`] and is replaced wholesale on every change.

use feed_types::Post;

/// Apply a content edit to the draft.
///
/// The text is trimmed first. Returns `None` when the trimmed text equals
/// the current content, so callers can skip publishing an identical draft.
pub fn edit_content(draft: &Post, text: &str) -> Option<Post> {
    let text = text.trim();
    if draft.content == text {
        return None;
    }
    Some(draft.with_content(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_types::PostId;

    #[test]
    fn edit_trims_whitespace() {
        let draft = Post::empty();
        let edited = edit_content(&draft, "  hello \n").unwrap();
        assert_eq!(edited.content, "hello");
    }

    #[test]
    fn same_trimmed_text_is_noop() {
        let draft = Post::empty().with_content("hello");
        assert!(edit_content(&draft, "hello").is_none());
        assert!(edit_content(&draft, "   hello  ").is_none());
    }

    #[test]
    fn blank_edit_on_empty_draft_is_noop() {
        assert!(edit_content(&Post::empty(), "   ").is_none());
    }

    #[test]
    fn edit_preserves_other_fields() {
        let draft = Post {
            id: PostId::new(9),
            author: "me".into(),
            likes: 2,
            ..Post::empty()
        };
        let edited = edit_content(&draft, "new text").unwrap();
        assert_eq!(edited.id, PostId::new(9));
        assert_eq!(edited.author, "me");
        assert_eq!(edited.likes, 2);
    }
}
