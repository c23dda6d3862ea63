use contributors_board::aggregate::merge_contributors;
use contributors_board::github::{contributors_url, parse_contributors, RemoteContributor};

// Integration tests focus on payload parsing and merging of recorded responses.
// Transport and retry behavior is covered by unit tests with the mock client.

fn fixtures() -> (Vec<RemoteContributor>, Vec<RemoteContributor>) {
    let framework_json = include_str!("../fixtures/github/framework_contributors.json");
    let skeleton_json = include_str!("../fixtures/github/skeleton_contributors.json");

    (
        parse_contributors("framework", framework_json).unwrap(),
        parse_contributors("skeleton", skeleton_json).unwrap(),
    )
}

#[test]
fn test_fixture_deserialization() {
    let (framework, skeleton) = fixtures();

    assert_eq!(framework.len(), 3);
    assert_eq!(framework[0].login, "rmunate");
    assert_eq!(framework[0].contributions, 412);
    assert_eq!(framework[1].login, "dependabot[bot]");

    assert_eq!(skeleton.len(), 2);
    assert_eq!(skeleton[1].id, 7654321);
}

#[test]
fn test_fixture_board() {
    let (framework, skeleton) = fixtures();
    let board = merge_contributors(&framework, &skeleton);

    let ranked: Vec<(&str, u64, usize)> = board
        .iter()
        .map(|c| (c.login.as_str(), c.total_contributions, c.rank))
        .collect();

    assert_eq!(
        ranked,
        vec![
            ("rmunate", 500, 1),
            ("asmith", 21, 2),
            ("dependabot[bot]", 17, 3),
            ("jdoe", 9, 4),
        ]
    );

    let lead = &board[0];
    assert_eq!(lead.framework_contributions, 412);
    assert_eq!(lead.skeleton_contributions, 88);
    assert_eq!(lead.html_url, "https://github.com/rmunate");
}

#[test]
fn test_error_payload_is_rejected() {
    let body = r#"{"message": "API rate limit exceeded", "documentation_url": "https://docs.github.com"}"#;
    assert!(parse_contributors("framework", body).is_err());
}

#[test]
fn test_endpoint_layout() {
    assert_eq!(
        contributors_url("https://api.github.com", "orionis-framework", "skeleton"),
        "https://api.github.com/repos/orionis-framework/skeleton/contributors"
    );
}
