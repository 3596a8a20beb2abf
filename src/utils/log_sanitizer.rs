//! Log sanitization for personally identifying values.
//!
//! Email addresses are logged in masked form so repository debug output can
//! be shared without leaking who was looked up.

/// Number of leading characters left visible by [`mask_email`].
const VISIBLE_CHARS: usize = 3;

/// Mask an email address for safe logging.
///
/// Keeps the first three characters of the local part (fewer if it is
/// shorter) and the domain.
///
/// # Examples
/// ```
/// use user_docstore::utils::mask_email;
///
/// assert_eq!(mask_email("user@example.com"), "use***@example.com");
/// assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
/// ```
pub fn mask_email(email: &str) -> String {
    let (local_part, domain) = match email.find('@') {
        Some(at_pos) => email.split_at(at_pos),
        None => (email, ""),
    };

    let visible: String = local_part.chars().take(VISIBLE_CHARS).collect();
    format!("{}***{}", visible, domain)
}
