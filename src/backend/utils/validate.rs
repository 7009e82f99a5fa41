use super::error::{BackendError, BackendResult};
use regex::Regex;
use std::sync::LazyLock;

pub fn validate_user_name(name: &str) -> BackendResult<()> {
    #[allow(clippy::expect_used)]
    static VALID_USER_NAME_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("compile regex"));

    if VALID_USER_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(BackendError::Validation("Invalid username".to_string()))
    }
}

pub fn validate_article_title(title: &str) -> BackendResult<String> {
    let title = title.trim();
    if title.is_empty() || title.len() > 200 {
        return Err(BackendError::Validation("Invalid title".to_string()));
    }
    Ok(title.to_string())
}

/// Returns the trimmed body, rejecting comments with nothing in them.
pub fn validate_comment_content(content: &str) -> BackendResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(BackendError::Validation(
            "Write something to leave a comment".to_string(),
        ));
    }
    Ok(content.to_string())
}

#[test]
#[expect(clippy::unwrap_used)]
fn test_validate_comment_content() {
    assert!(validate_comment_content("").is_err());
    assert!(validate_comment_content(" \n\t").is_err());
    assert_eq!(validate_comment_content("  hi there ").unwrap(), "hi there");
}
