//! GitHub event transformation.
//!
//! Maps a webhook event into a [`NormalizedNotification`]. The mapping is a
//! table of `(event, action) -> builder` rules; the first matching rule wins.
//! Events with no matching rule produce `None`, which callers treat as
//! "nothing to forward".
//!
//! ## Processing Flow
//!
//! ```text
//! (X-GitHub-Event, payload) → RULES lookup → builder → Option<NormalizedNotification>
//! ```

pub mod payload;
pub mod types;

use tracing::debug;

pub use payload::Payload;
pub use types::{NormalizedNotification, Priority};

use payload::{NO_COMMENT, NO_COMMIT_MESSAGE, NO_DESCRIPTION, NO_RELEASE_NOTES, UNKNOWN};

/// Tag every message starts with.
const MESSAGE_TAG: &str = "[GitHub]";

/// Ref prefix stripped from push refs to get the branch name.
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Number of most recent commits listed in a push summary.
const PUSH_SUMMARY_LIMIT: usize = 5;

/// Length of abbreviated commit ids.
const SHORT_SHA_LEN: usize = 7;

type Builder = fn(&Payload<'_>) -> Option<NormalizedNotification>;

/// One row of the dispatch table.
struct Rule {
    event: &'static str,
    /// `None` matches any action, including none at all.
    action: Option<&'static str>,
    build: Builder,
}

impl Rule {
    fn matches(&self, event: &str, action: Option<&str>) -> bool {
        self.event == event && self.action.map_or(true, |a| action == Some(a))
    }
}

const RULES: &[Rule] = &[
    Rule { event: "issues", action: Some("opened"), build: issue_opened },
    Rule { event: "issues", action: Some("closed"), build: issue_closed },
    Rule { event: "issue_comment", action: Some("created"), build: issue_comment_created },
    Rule { event: "pull_request", action: Some("opened"), build: pull_request_opened },
    Rule { event: "pull_request", action: Some("closed"), build: pull_request_closed },
    Rule { event: "pull_request_review", action: Some("submitted"), build: review_submitted },
    Rule { event: "push", action: None, build: push },
    Rule { event: "release", action: Some("published"), build: release_published },
    Rule { event: "ping", action: None, build: ping },
];

/// Transform a GitHub event into a notification.
///
/// Pure: no I/O, no side effects. Unknown events and actions yield `None`.
pub fn transform(event_type: &str, payload: &serde_json::Value) -> Option<NormalizedNotification> {
    let payload = Payload::new(payload);
    let action = payload.action();

    let rule = RULES.iter().find(|r| r.matches(event_type, action))?;
    let notification = (rule.build)(&payload);

    debug!(
        event = event_type,
        action = action.unwrap_or(""),
        produced = notification.is_some(),
        "transform_rule_matched"
    );

    notification
}

/// `github:<repo>:<kind>[:<id>]`
fn session_key(repo: &str, kind: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("github:{}:{}:{}", repo, kind, id),
        None => format!("github:{}:{}", repo, kind),
    }
}

fn issue_opened(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/issue/number");
    let message = format!(
        "{} New issue #{} in {}: {}\n\nBy: {}\n\n{}",
        MESSAGE_TAG,
        number,
        repo,
        p.str_or("/issue/title", ""),
        p.sender(),
        p.str_or("/issue/body", NO_DESCRIPTION),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "issue", Some(&number)),
        Priority::Normal,
    ))
}

fn issue_closed(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/issue/number");
    let message = format!(
        "{} Issue #{} closed in {}: {}\n\nClosed by: {}",
        MESSAGE_TAG,
        number,
        repo,
        p.str_or("/issue/title", ""),
        p.sender(),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "issue", Some(&number)),
        Priority::Low,
    ))
}

fn issue_comment_created(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/issue/number");
    let message = format!(
        "{} New comment on #{} in {}\n\nBy: {}\n\n{}",
        MESSAGE_TAG,
        number,
        repo,
        p.sender(),
        p.str_or("/comment/body", NO_COMMENT),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "issue", Some(&number)),
        Priority::Normal,
    ))
}

fn pull_request_opened(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/pull_request/number");
    let message = format!(
        "{} New PR #{} in {}: {}\n\nBy: {}\n\n{}\n\nBranch: {} → {}",
        MESSAGE_TAG,
        number,
        repo,
        p.str_or("/pull_request/title", ""),
        p.sender(),
        p.str_or("/pull_request/body", NO_DESCRIPTION),
        p.str_or("/pull_request/head/ref", UNKNOWN),
        p.str_or("/pull_request/base/ref", UNKNOWN),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "pr", Some(&number)),
        Priority::High,
    ))
}

fn pull_request_closed(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/pull_request/number");
    let outcome = if p.flag("/pull_request/merged") {
        "merged"
    } else {
        "closed without merge"
    };
    let message = format!(
        "{} PR #{} {} in {}: {}",
        MESSAGE_TAG,
        number,
        outcome,
        repo,
        p.str_or("/pull_request/title", ""),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "pr", Some(&number)),
        Priority::Normal,
    ))
}

fn review_submitted(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let number = p.ident("/pull_request/number");
    // approved, changes_requested, commented
    let state = p.str_or("/review/state", UNKNOWN);
    let priority = if state == "changes_requested" {
        Priority::High
    } else {
        Priority::Normal
    };
    let message = format!(
        "{} PR #{} review ({}) in {}\n\nBy: {}\n\n{}",
        MESSAGE_TAG,
        number,
        state,
        repo,
        p.sender(),
        p.str_or("/review/body", NO_COMMENT),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "pr", Some(&number)),
        priority,
    ))
}

fn push(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let commits = p.list("/commits");
    if commits.is_empty() {
        return None;
    }

    let repo = p.repo();
    let branch = p
        .str("/ref")
        .map(|r| r.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(r))
        .filter(|b| !b.is_empty())
        .unwrap_or(UNKNOWN);

    // GitHub lists commits oldest first; keep the newest, in push order
    let summary = commits
        .iter()
        .skip(commits.len().saturating_sub(PUSH_SUMMARY_LIMIT))
        .map(|c| {
            let headline = c
                .str("/message")
                .and_then(|m| m.lines().next())
                .unwrap_or(NO_COMMIT_MESSAGE);
            let short_id: String = c.str_or("/id", UNKNOWN).chars().take(SHORT_SHA_LEN).collect();
            format!("- {} ({})", headline, short_id)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let overflow = if commits.len() > PUSH_SUMMARY_LIMIT {
        format!("\n... and {} more", commits.len() - PUSH_SUMMARY_LIMIT)
    } else {
        String::new()
    };

    let message = format!(
        "{} {} commit(s) pushed to {}:{}\n\nBy: {}\n\n{}{}",
        MESSAGE_TAG,
        commits.len(),
        repo,
        branch,
        p.sender(),
        summary,
        overflow,
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "push", None),
        Priority::Low,
    ))
}

fn release_published(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let tag = p.ident("/release/tag_name");
    let message = format!(
        "{} New release {} in {}: {}\n\nBy: {}\n\n{}",
        MESSAGE_TAG,
        tag,
        repo,
        p.str("/release/name").unwrap_or(&tag),
        p.sender(),
        p.str_or("/release/body", NO_RELEASE_NOTES),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "release", Some(&tag)),
        Priority::High,
    ))
}

fn ping(p: &Payload<'_>) -> Option<NormalizedNotification> {
    let repo = p.repo();
    let message = format!(
        "{} Webhook configured for {}. Zen: {}",
        MESSAGE_TAG,
        repo,
        p.str_or("/zen", ""),
    );
    Some(NormalizedNotification::new(
        message,
        session_key(repo, "ping", None),
        Priority::Low,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_opened() {
        let payload = json!({
            "action": "opened",
            "issue": { "number": 42, "title": "T" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "u" }
        });

        let n = transform("issues", &payload).unwrap();

        assert_eq!(n.session_key, "github:o/r:issue:42");
        assert_eq!(n.priority, Priority::Normal);
        assert!(n.message.contains("#42"));
        assert!(n.message.contains("T"));
        assert!(n.message.contains("u"));
        assert!(n.message.ends_with(NO_DESCRIPTION));
    }

    #[test]
    fn test_issue_opened_with_body() {
        let payload = json!({
            "action": "opened",
            "issue": { "number": 3, "title": "Crash on start", "body": "Stack trace attached" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "alice" }
        });

        let n = transform("issues", &payload).unwrap();
        assert_eq!(
            n.message,
            "[GitHub] New issue #3 in o/r: Crash on start\n\nBy: alice\n\nStack trace attached"
        );
    }

    #[test]
    fn test_issue_closed() {
        let payload = json!({
            "action": "closed",
            "issue": { "number": 9, "title": "Old bug" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "maintainer" }
        });

        let n = transform("issues", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:issue:9");
        assert_eq!(n.priority, Priority::Low);
        assert!(n.message.contains("Closed by: maintainer"));
    }

    #[test]
    fn test_issue_unhandled_action() {
        let payload = json!({
            "action": "labeled",
            "issue": { "number": 9 },
            "repository": { "full_name": "o/r" }
        });
        assert!(transform("issues", &payload).is_none());
    }

    #[test]
    fn test_issue_comment_created() {
        let payload = json!({
            "action": "created",
            "issue": { "number": 42 },
            "comment": { "body": "Looks good" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "bob" }
        });

        let n = transform("issue_comment", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:issue:42");
        assert_eq!(n.priority, Priority::Normal);
        assert!(n.message.contains("Looks good"));
        assert!(n.message.contains("By: bob"));
    }

    #[test]
    fn test_issue_comment_missing_body() {
        let payload = json!({
            "action": "created",
            "issue": { "number": 42 },
            "repository": { "full_name": "o/r" }
        });

        let n = transform("issue_comment", &payload).unwrap();
        assert!(n.message.ends_with(NO_COMMENT));
    }

    #[test]
    fn test_pull_request_opened() {
        let payload = json!({
            "action": "opened",
            "pull_request": {
                "number": 7,
                "title": "Add feature",
                "head": { "ref": "feature/x" },
                "base": { "ref": "main" }
            },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "carol" }
        });

        let n = transform("pull_request", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:pr:7");
        assert_eq!(n.priority, Priority::High);
        assert!(n.message.contains(NO_DESCRIPTION));
        assert!(n.message.ends_with("Branch: feature/x → main"));
    }

    #[test]
    fn test_pull_request_closed_merged() {
        let payload = json!({
            "action": "closed",
            "pull_request": { "number": 7, "merged": true, "title": "X" },
            "repository": { "full_name": "o/r" }
        });

        let n = transform("pull_request", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:pr:7");
        assert_eq!(n.priority, Priority::Normal);
        assert!(n.message.contains("merged"));
        assert!(!n.message.contains("closed without merge"));
    }

    #[test]
    fn test_pull_request_closed_without_merge() {
        let payload = json!({
            "action": "closed",
            "pull_request": { "number": 7, "merged": false, "title": "X" },
            "repository": { "full_name": "o/r" }
        });

        let n = transform("pull_request", &payload).unwrap();
        assert_eq!(n.message, "[GitHub] PR #7 closed without merge in o/r: X");
    }

    #[test]
    fn test_review_changes_requested_is_high() {
        let payload = json!({
            "action": "submitted",
            "pull_request": { "number": 11 },
            "review": { "state": "changes_requested", "body": "Please add tests" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "reviewer" }
        });

        let n = transform("pull_request_review", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:pr:11");
        assert_eq!(n.priority, Priority::High);
        assert!(n.message.contains("review (changes_requested)"));
        assert!(n.message.contains("Please add tests"));
    }

    #[test]
    fn test_review_approved_is_normal() {
        let payload = json!({
            "action": "submitted",
            "pull_request": { "number": 11 },
            "review": { "state": "approved" },
            "repository": { "full_name": "o/r" }
        });

        let n = transform("pull_request_review", &payload).unwrap();
        assert_eq!(n.priority, Priority::Normal);
        assert!(n.message.ends_with(NO_COMMENT));
    }

    #[test]
    fn test_push_without_commits() {
        assert!(transform("push", &json!({ "commits": [] })).is_none());
        assert!(transform("push", &json!({})).is_none());
    }

    #[test]
    fn test_push_summary() {
        let payload = json!({
            "ref": "refs/heads/main",
            "commits": [
                { "id": "0123456789abcdef", "message": "Fix parser\n\nLonger explanation" },
                { "id": "fedcba9876543210", "message": "Bump version" }
            ],
            "repository": { "full_name": "o/r" },
            "sender": { "login": "dev" }
        });

        let n = transform("push", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:push");
        assert_eq!(n.priority, Priority::Low);
        assert_eq!(
            n.message,
            "[GitHub] 2 commit(s) pushed to o/r:main\n\nBy: dev\n\n\
             - Fix parser (0123456)\n\
             - Bump version (fedcba9)"
        );
    }

    #[test]
    fn test_push_overflow() {
        let commits: Vec<_> = (0..8)
            .map(|i| json!({ "id": format!("{:040}", i), "message": format!("commit {}", i) }))
            .collect();
        let payload = json!({
            "ref": "refs/heads/release/1.x",
            "commits": commits,
            "repository": { "full_name": "o/r" }
        });

        let n = transform("push", &payload).unwrap();
        assert!(n.message.starts_with("[GitHub] 8 commit(s) pushed to o/r:release/1.x"));
        assert_eq!(n.message.matches("\n- commit").count(), 5);
        assert!(n.message.ends_with("\n... and 3 more"));
    }

    #[test]
    fn test_push_lists_most_recent_commits_in_order() {
        // Oldest first, as GitHub sends them
        let commits: Vec<_> = (0..8)
            .map(|i| json!({ "id": format!("{}abcdef0123", i), "message": format!("commit {}", i) }))
            .collect();
        let payload = json!({
            "ref": "refs/heads/main",
            "commits": commits,
            "repository": { "full_name": "o/r" }
        });

        let n = transform("push", &payload).unwrap();
        for old in 0..3 {
            assert!(
                !n.message.contains(&format!("commit {}", old)),
                "commit {} is older than the newest five",
                old
            );
        }
        assert!(n.message.contains(
            "- commit 3 (3abcdef)\n\
             - commit 4 (4abcdef)\n\
             - commit 5 (5abcdef)\n\
             - commit 6 (6abcdef)\n\
             - commit 7 (7abcdef)\n... and 3 more"
        ));
    }

    #[test]
    fn test_push_empty_branch_name() {
        let payload = json!({
            "ref": "refs/heads/",
            "commits": [{ "id": "abcdef0123", "message": "m" }],
            "repository": { "full_name": "o/r" }
        });

        let n = transform("push", &payload).unwrap();
        assert_eq!(
            n.message,
            "[GitHub] 1 commit(s) pushed to o/r:unknown\n\nBy: unknown\n\n- m (abcdef0)"
        );
    }

    #[test]
    fn test_push_non_branch_ref() {
        let payload = json!({
            "ref": "refs/tags/v1.0.0",
            "commits": [{ "id": "abc", "message": "tag" }]
        });

        let n = transform("push", &payload).unwrap();
        assert!(n.message.contains("unknown/repo:refs/tags/v1.0.0"));
        assert!(n.message.contains("- tag (abc)"));
    }

    #[test]
    fn test_release_published() {
        let payload = json!({
            "action": "published",
            "release": { "tag_name": "v2.0.0", "name": "Two", "body": "Notes" },
            "repository": { "full_name": "o/r" },
            "sender": { "login": "rel" }
        });

        let n = transform("release", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:release:v2.0.0");
        assert_eq!(n.priority, Priority::High);
        assert_eq!(
            n.message,
            "[GitHub] New release v2.0.0 in o/r: Two\n\nBy: rel\n\nNotes"
        );
    }

    #[test]
    fn test_release_name_falls_back_to_tag() {
        let payload = json!({
            "action": "published",
            "release": { "tag_name": "v2.0.1" },
            "repository": { "full_name": "o/r" }
        });

        let n = transform("release", &payload).unwrap();
        assert!(n.message.contains("in o/r: v2.0.1"));
        assert!(n.message.ends_with(NO_RELEASE_NOTES));
    }

    #[test]
    fn test_ping() {
        let payload = json!({
            "zen": "Design for failure.",
            "hook_id": 1,
            "repository": { "full_name": "o/r" }
        });

        let n = transform("ping", &payload).unwrap();
        assert_eq!(n.session_key, "github:o/r:ping");
        assert_eq!(n.priority, Priority::Low);
        assert_eq!(
            n.message,
            "[GitHub] Webhook configured for o/r. Zen: Design for failure."
        );
    }

    #[test]
    fn test_defaults_for_missing_repo_and_sender() {
        let payload = json!({ "action": "opened", "issue": { "number": 1 } });

        let n = transform("issues", &payload).unwrap();
        assert_eq!(n.session_key, "github:unknown/repo:issue:1");
        assert!(n.message.contains("By: unknown"));
    }

    #[test]
    fn test_unrecognized_event() {
        let payload = json!({ "action": "created", "repository": { "full_name": "o/r" } });
        assert!(transform("workflow_run", &payload).is_none());
        assert!(transform("", &payload).is_none());
        assert!(transform("release", &json!({ "action": "deleted" })).is_none());
        assert!(transform("issues", &json!(null)).is_none());
    }

    #[test]
    fn test_every_notification_is_complete() {
        let cases = [
            ("issues", json!({ "action": "opened" })),
            ("issues", json!({ "action": "closed" })),
            ("issue_comment", json!({ "action": "created" })),
            ("pull_request", json!({ "action": "opened" })),
            ("pull_request", json!({ "action": "closed" })),
            ("pull_request_review", json!({ "action": "submitted" })),
            ("push", json!({ "commits": [{}] })),
            ("release", json!({ "action": "published" })),
            ("ping", json!({})),
        ];

        for (event, payload) in cases {
            let n = transform(event, &payload)
                .unwrap_or_else(|| panic!("{} should produce a notification", event));
            assert!(!n.message.is_empty(), "{} message empty", event);
            assert!(n.session_key.starts_with("github:"), "{} session key", event);
        }
    }
}
