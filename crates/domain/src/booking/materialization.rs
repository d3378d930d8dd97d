/// A guest email is valid iff it contains `@` with a non-empty local
/// part and a host part of length ≥ 2 (spec §4.3, step 2).
pub fn is_valid_guest_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && host.len() >= 2
}

/// Compose the calendar event description: the template description,
/// optionally appended with `"Agenda:\n" + answers.agenda` when the
/// booking's answers contain a non-empty `agenda` field.
pub fn compose_description(
    template_description: Option<&str>,
    answers: Option<&serde_json::Value>,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(desc) = template_description {
        if !desc.is_empty() {
            parts.push(desc.to_string());
        }
    }
    if let Some(agenda) = answers
        .and_then(|a| a.get("agenda"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
    {
        parts.push(format!("Agenda:\n{agenda}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_emails() {
        assert!(is_valid_guest_email("a@bc"));
        assert!(is_valid_guest_email("user@example.com"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_guest_email("no-at-sign"));
        assert!(!is_valid_guest_email("@bc"));
        assert!(!is_valid_guest_email("a@b"));
    }

    #[test]
    fn description_without_agenda() {
        let desc = compose_description(Some("30 minute sync"), None);
        assert_eq!(desc.as_deref(), Some("30 minute sync"));
    }

    #[test]
    fn description_with_agenda_appended() {
        let answers = json!({"agenda": "Discuss roadmap"});
        let desc = compose_description(Some("30 minute sync"), Some(&answers));
        assert_eq!(desc.as_deref(), Some("30 minute sync\n\nAgenda:\nDiscuss roadmap"));
    }

    #[test]
    fn no_description_or_agenda_yields_none() {
        assert_eq!(compose_description(None, None), None);
    }
}
