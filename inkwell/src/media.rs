//! Image and avatar URL handling.

use inkwell_types::Comment;

use crate::thread::ANONYMOUS;

/// Resolve an image path returned by the API against the configured origin.
///
/// Absolute `http(s)` URLs and embedded `data:` URLs are returned unchanged.
pub fn resolve_media_url(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// What to draw in place of an author's picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    /// Initial-letter glyph; `known` picks the accent colour over the dim one
    Initial { letter: char, known: bool },
}

impl Avatar {
    pub fn for_author(origin: &str, comment: &Comment) -> Self {
        if let Some(picture) = comment.author_picture().filter(|p| !p.trim().is_empty()) {
            return Avatar::Image(resolve_media_url(origin, picture));
        }

        match comment.author_username().filter(|name| !name.is_empty()) {
            Some(name) => Avatar::Initial {
                letter: initial(name),
                known: true,
            },
            None => Avatar::Initial {
                letter: initial(ANONYMOUS),
                known: false,
            },
        }
    }
}

fn initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::comment;
    use inkwell_types::ProfilePic;

    #[test]
    fn test_relative_path_joins_origin() {
        assert_eq!(
            resolve_media_url("https://api.x.com", "/uploads/a.png"),
            "https://api.x.com/uploads/a.png"
        );
        assert_eq!(
            resolve_media_url("https://api.x.com/", "uploads/a.png"),
            "https://api.x.com/uploads/a.png"
        );
    }

    #[test]
    fn test_absolute_urls_unchanged() {
        assert_eq!(
            resolve_media_url("https://api.x.com", "https://cdn.x.com/a.png"),
            "https://cdn.x.com/a.png"
        );
        assert_eq!(
            resolve_media_url("https://api.x.com", "data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_avatar_variants() {
        let mut with_pic = comment("c1", Some("bob"));
        with_pic.user.as_mut().unwrap().profile_pic = Some(ProfilePic {
            url: "/uploads/b.png".to_string(),
        });
        assert_eq!(
            Avatar::for_author("https://api.x.com", &with_pic),
            Avatar::Image("https://api.x.com/uploads/b.png".to_string())
        );

        assert_eq!(
            Avatar::for_author("https://api.x.com", &comment("c2", Some("bob"))),
            Avatar::Initial { letter: 'B', known: true }
        );
        assert_eq!(
            Avatar::for_author("https://api.x.com", &comment("c3", None)),
            Avatar::Initial { letter: 'A', known: false }
        );
    }
}
