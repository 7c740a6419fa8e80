//! Contact deep links.

use crate::models::Teammate;

pub fn email_link(teammate: &Teammate) -> Option<String> {
    non_empty(teammate.email.as_deref()).map(|email| format!("mailto:{}", email))
}

/// `slack://user?team=<workspace>&id=<member>`; needs both ids.
pub fn slack_link(teammate: &Teammate, workspace: Option<&str>) -> Option<String> {
    let member = non_empty(teammate.slack_id.as_deref())?;
    let team = non_empty(workspace)?;
    Some(format!("slack://user?team={}&id={}", team, member))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTeammate;
    use uuid::Uuid;

    #[test]
    fn test_links() {
        let teammate = NewTeammate {
            email: Some("mei@example.com".to_string()),
            slack_id: Some("U024BE7LH".to_string()),
            ..NewTeammate::new("Mei", "Asia/Tokyo")
        }
        .into_teammate(Uuid::new_v4());

        assert_eq!(email_link(&teammate).as_deref(), Some("mailto:mei@example.com"));
        assert_eq!(
            slack_link(&teammate, Some("T0001")).as_deref(),
            Some("slack://user?team=T0001&id=U024BE7LH")
        );
        assert!(slack_link(&teammate, None).is_none());
        assert!(slack_link(&teammate, Some("  ")).is_none());
    }

    #[test]
    fn test_missing_fields_give_no_links() {
        let teammate = NewTeammate::new("Ana", "UTC").into_teammate(Uuid::new_v4());
        assert!(email_link(&teammate).is_none());
        assert!(slack_link(&teammate, Some("T0001")).is_none());
    }
}
