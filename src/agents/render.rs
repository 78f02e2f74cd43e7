use std::fmt::Write;

use crate::model::story::UserStories;

/// Human-readable report of generated stories.
pub fn render_user_stories(stories: &UserStories) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Generated User Stories:");
    let _ = writeln!(out, "\nEpic: {}", stories.epic);

    for (idx, story) in stories.user_stories.iter().enumerate() {
        let _ = writeln!(out, "\n🔹 User Story {}:", idx + 1);
        let _ = writeln!(out, "  As a {}", story.as_a);
        let _ = writeln!(out, "  I want {}", story.i_want);
        let _ = writeln!(out, "  So that {}", story.so_that);
        let _ = writeln!(out, "\n  Acceptance Criteria:");
        for criterion in &story.acceptance_criteria {
            let _ = writeln!(out, "  ✓ {criterion}");
        }
    }

    out
}
