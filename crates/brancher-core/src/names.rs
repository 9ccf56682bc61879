use uuid::Uuid;

/// Length of the identifier prefix appended to every synthesized branch name.
pub const SHORT_TOKEN_LEN: usize = 8;

/// Builds `@<code>/<token>` from a fresh random identifier.
///
/// No check against existing branches happens here; a collision only shows up
/// when git refuses to create the branch.
pub fn synthesize_branch_name(category_code: &str) -> String {
    branch_name_from_id(category_code, Uuid::new_v4())
}

pub fn branch_name_from_id(category_code: &str, id: Uuid) -> String {
    let hyphenated = id.hyphenated().to_string();
    let token: String = hyphenated.chars().take(SHORT_TOKEN_LEN).collect();
    format!("@{category_code}/{token}")
}
