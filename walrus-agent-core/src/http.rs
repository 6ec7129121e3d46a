const MAX_BODY: usize = 200;

/// Shorten an error response body for inclusion in a message.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY {
        return body.to_string();
    }

    let mut end = MAX_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), MAX_BODY + 3);
    }
}
