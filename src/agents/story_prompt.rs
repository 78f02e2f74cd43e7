use crate::model::board::CardView;

const NO_DESCRIPTION: &str = "No description provided";

pub fn build_prompt(card: &CardView) -> String {
    let description = card
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(NO_DESCRIPTION);

    format!(
        r#"Generate user stories for the following Trello card task.

Card Title: {title}
Description: {description}

Return a JSON object with this exact structure:
{{
    "epic": "<The main card title/goal>",
    "user_stories": [
        {{
            "as_a": "<type of user>",
            "i_want": "<specific action or feature>",
            "so_that": "<benefit or value>",
            "acceptance_criteria": [
                "<specific requirement 1>",
                "<specific requirement 2>",
                "..."
            ]
        }}
    ]
}}"#,
        title = card.name,
        description = description,
    )
}
